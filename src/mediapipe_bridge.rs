// src/mediapipe_bridge.rs - MediaPipe hand landmarks via a helper process
//!
//! The helper prints `READY` once its model is loaded. For every frame it then
//! reads a header of three little-endian `u32`s (width, height, channels)
//! followed by packed RGB bytes, and answers with one JSON line:
//!
//! ```json
//! {"hands": [{"handedness": "Right", "score": 0.97, "landmarks": [{"x": 0.5, "y": 0.4, "z": -0.01}]}], "error": null}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbaImage;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::DetectorConfig;
use crate::error::DetectorError;
use crate::landmarks::LandmarkSnapshot;
use crate::pipeline::LandmarkProvider;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score: Option<f32>,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

pub struct MediaPipeBridge {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
    rgb_scratch: Vec<u8>,
    online: bool,
}

impl MediaPipeBridge {
    pub fn spawn(config: &DetectorConfig) -> Result<Self, DetectorError> {
        info!("Starting landmark detector: {} {}", config.command, config.args.join(" "));

        let mut process = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| DetectorError::Spawn {
                command: config.command.clone(),
                source,
            })?;

        let stdin = process.stdin.take().ok_or(DetectorError::Closed)?;
        let stdout = process.stdout.take().ok_or(DetectorError::Closed)?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        if stdout.read_line(&mut ready)? == 0 {
            let _ = process.kill();
            return Err(DetectorError::Closed);
        }
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(DetectorError::Handshake(ready.trim().to_string()));
        }

        info!("Landmark detector ready");
        Ok(Self {
            process,
            stdin,
            stdout,
            min_confidence: config.min_confidence,
            rgb_scratch: Vec::new(),
            online: true,
        })
    }

    fn round_trip(&mut self, frame: &RgbaImage) -> Result<Vec<LandmarkSnapshot>, DetectorError> {
        self.send_frame(frame)?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(DetectorError::Closed);
        }
        parse_response(&line, self.min_confidence)
    }

    fn send_frame(&mut self, frame: &RgbaImage) -> Result<(), DetectorError> {
        self.rgb_scratch.clear();
        self.rgb_scratch.reserve((frame.width() * frame.height() * 3) as usize);
        for pixel in frame.pixels() {
            self.rgb_scratch.extend_from_slice(&pixel.0[..3]);
        }

        self.stdin.write_all(&frame.width().to_le_bytes())?;
        self.stdin.write_all(&frame.height().to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&self.rgb_scratch)?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl LandmarkProvider for MediaPipeBridge {
    fn detect(&mut self, frame: &RgbaImage) -> Result<Vec<LandmarkSnapshot>, DetectorError> {
        if !self.online {
            return Ok(Vec::new());
        }

        let result = self.round_trip(frame);
        if let Err(e @ (DetectorError::Closed | DetectorError::Io(_))) = &result {
            error!("Landmark detector stopped, drawing disabled: {}", e);
            self.online = false;
            let _ = self.process.kill();
        }
        result
    }

    fn is_online(&self) -> bool {
        self.online
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Turns one response line into snapshots, dropping low-confidence and
/// malformed hands. A detector-side error counts as "no hands".
pub fn parse_response(line: &str, min_confidence: f32) -> Result<Vec<LandmarkSnapshot>, DetectorError> {
    let response: DetectionResponse =
        serde_json::from_str(line.trim()).map_err(|source| DetectorError::Protocol {
            line: line.trim().to_string(),
            source,
        })?;

    if let Some(error) = response.error {
        warn!("Detector reported an error: {}", error);
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(response.hands.len());
    for hand in response.hands {
        if hand.score.is_some_and(|score| score < min_confidence) {
            debug!("Dropping hand below confidence threshold: {:?}", hand.score);
            continue;
        }

        let raw: Vec<[f32; 3]> = hand.landmarks.iter().map(|lm| [lm.x, lm.y, lm.z]).collect();
        match LandmarkSnapshot::from_slice(&raw) {
            Ok(mut snapshot) => {
                snapshot.handedness = hand.handedness;
                snapshot.score = hand.score;
                hands.push(snapshot);
            }
            Err(e) => warn!("Skipping hand: {}", e),
        }
    }
    Ok(hands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::INDEX_TIP;

    fn hand_json(score: f32, count: usize) -> String {
        let landmarks: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x": {}, "y": 0.5, "z": 0.0}}"#, i as f32 / 100.0))
            .collect();
        format!(
            r#"{{"handedness": "Right", "score": {}, "landmarks": [{}]}}"#,
            score,
            landmarks.join(",")
        )
    }

    #[test]
    fn parses_hands_in_order() {
        let line = format!(r#"{{"hands": [{}, {}]}}"#, hand_json(0.9, 21), hand_json(0.8, 21));
        let hands = parse_response(&line, 0.5).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].handedness.as_deref(), Some("Right"));
        assert_eq!(hands[0].score, Some(0.9));
        assert!((hands[1].joint(INDEX_TIP).x - 0.08).abs() < 1e-6);
    }

    #[test]
    fn drops_weak_and_malformed_hands() {
        let line = format!(
            r#"{{"hands": [{}, {}, {}]}}"#,
            hand_json(0.2, 21),
            hand_json(0.9, 20),
            hand_json(0.9, 21)
        );
        assert_eq!(parse_response(&line, 0.5).unwrap().len(), 1);
    }

    #[test]
    fn detector_error_means_no_hands() {
        let hands = parse_response(r#"{"hands": [], "error": "model crashed"}"#, 0.5).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn empty_response_means_no_hands() {
        assert!(parse_response("{}\n", 0.5).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        let err = parse_response("Traceback (most recent call last):", 0.5).unwrap_err();
        assert!(matches!(err, DetectorError::Protocol { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn dead_helper_goes_offline_after_one_failure() {
        let config = DetectorConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "echo READY".to_string()],
            ..DetectorConfig::default()
        };
        let mut bridge = MediaPipeBridge::spawn(&config).unwrap();
        let frame = RgbaImage::new(4, 4);

        assert!(bridge.is_online());
        assert!(bridge.detect(&frame).is_err());
        assert!(!bridge.is_online());
        // later frames are not sent to the dead process
        assert!(bridge.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn missing_command_fails_to_spawn() {
        let config = DetectorConfig {
            command: "air-canvas-no-such-detector".to_string(),
            args: Vec::new(),
            ..DetectorConfig::default()
        };
        assert!(matches!(
            MediaPipeBridge::spawn(&config),
            Err(DetectorError::Spawn { .. })
        ));
    }
}

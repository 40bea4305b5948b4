// src/pipeline.rs
//! Per-frame sequencing: classify each detected hand, pick up palette
//! colors, advance the pen and paint the canvas.

use image::RgbaImage;
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::config::DrawingConfig;
use crate::error::DetectorError;
use crate::gesture::{classify, GestureVerdict};
use crate::landmarks::{LandmarkSnapshot, PixelPoint, INDEX_TIP};
use crate::palette::{Color, Palette};
use crate::stroke::{PenState, Segment, StrokeAction, StrokeTracker};

/// Source of camera frames. `None` means no frame is available this tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<RgbaImage>;
}

/// Hand landmark detector. One snapshot per detected hand.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &RgbaImage) -> Result<Vec<LandmarkSnapshot>, DetectorError>;

    /// `false` once the provider has given up; it then reports no hands.
    fn is_online(&self) -> bool {
        true
    }
}

/// What happened while processing one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// One verdict per hand, in provider order.
    pub verdicts: Vec<GestureVerdict>,
    pub segments: Vec<Segment>,
    pub anchored_at: Option<PixelPoint>,
    pub selected_color: Option<Color>,
    pub cleared: bool,
    pub resized: bool,
}

impl FrameReport {
    pub fn hand_count(&self) -> usize {
        self.verdicts.len()
    }
}

/// A camera frame together with what the pipeline made of it.
pub struct ProcessedFrame {
    pub camera: RgbaImage,
    pub hands: Vec<LandmarkSnapshot>,
    pub report: FrameReport,
}

pub struct DrawingPipeline {
    config: DrawingConfig,
    palette: Palette,
    tracker: StrokeTracker,
    canvas: Canvas,
    frames_processed: u64,
}

impl DrawingPipeline {
    pub fn new(config: DrawingConfig) -> Self {
        let palette = Palette::from_config(&config);
        let tracker = StrokeTracker::new(palette.default_color(), config.open_hand_clears);
        Self {
            config,
            palette,
            tracker,
            canvas: Canvas::new(0, 0),
            frames_processed: 0,
        }
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn pen_state(&self) -> &PenState {
        self.tracker.state()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Wipes the canvas without touching the pen.
    pub fn clear_canvas(&mut self) {
        self.canvas.clear();
    }

    /// Pulls one frame and its landmarks. Returns `None` when the source had
    /// nothing, in which case no state is touched.
    pub fn step<S, P>(&mut self, source: &mut S, provider: &mut P) -> Option<ProcessedFrame>
    where
        S: FrameSource + ?Sized,
        P: LandmarkProvider + ?Sized,
    {
        let camera = source.next_frame()?;

        let hands = match provider.detect(&camera) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("Landmark detection failed, treating frame as empty: {}", e);
                Vec::new()
            }
        };

        let report = self.process_frame(camera.width(), camera.height(), &hands);
        Some(ProcessedFrame {
            camera,
            hands,
            report,
        })
    }

    pub fn process_frame(
        &mut self,
        frame_width: u32,
        frame_height: u32,
        hands: &[LandmarkSnapshot],
    ) -> FrameReport {
        let mut report = FrameReport {
            resized: self.canvas.ensure_size(frame_width, frame_height),
            ..FrameReport::default()
        };
        self.frames_processed += 1;

        if hands.is_empty() {
            self.tracker.hand_lost();
            return report;
        }

        // Hands share one pen, so the last hand in the list wins.
        for hand in hands {
            let verdict = classify(
                hand,
                frame_width,
                frame_height,
                &self.config.pen_pose_thresholds,
            );
            report.verdicts.push(verdict);

            let tip = hand.pixel(INDEX_TIP, frame_width, frame_height);

            if verdict != GestureVerdict::OpenHand {
                if let Some(color) = self.palette.select(tip, frame_width) {
                    self.tracker.select_color(color);
                    report.selected_color = Some(color);
                }
            }

            match self.tracker.advance(verdict, tip) {
                StrokeAction::Clear => {
                    debug!("Open hand, clearing canvas");
                    self.canvas.clear();
                    report.cleared = true;
                }
                StrokeAction::Extend(segment) => {
                    self.canvas.draw_line(
                        segment.from,
                        segment.to,
                        segment.color,
                        self.config.line_thickness,
                    );
                    report.segments.push(segment);
                }
                StrokeAction::Anchor(point) => report.anchored_at = Some(point),
                StrokeAction::Lift => {}
            }
        }

        report
    }
}

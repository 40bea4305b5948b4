// src/video.rs - Camera capture for the drawing loop
use image::{DynamicImage, RgbaImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use tracing::{debug, info, warn};

use crate::config::CameraConfig;
use crate::error::CaptureError;
use crate::pipeline::FrameSource;

/// Webcam frames, unmirrored. Mirroring for the selfie view happens at display time
/// so that landmark coordinates and canvas coordinates stay in the same space.
pub struct CameraSource {
    camera: Camera,
    index: u32,
}

impl CameraSource {
    pub fn open(config: &CameraConfig) -> Result<Self, CaptureError> {
        debug!("Attempting to open camera index {}", config.index);

        let format = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::MJPEG,
            config.fps,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let camera = Camera::new(CameraIndex::Index(config.index), requested).map_err(|e| {
            CaptureError::Open {
                index: config.index,
                message: e.to_string(),
            }
        })?;

        info!(
            "Opened camera {} ({}) at {}",
            config.index,
            camera.info().human_name(),
            camera.resolution()
        );
        Ok(Self {
            camera,
            index: config.index,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn capture(&mut self) -> Result<RgbaImage, CaptureError> {
        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .map_err(|e| CaptureError::Stream(e.to_string()))?;
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| CaptureError::Frame(e.to_string()))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Decode(e.to_string()))?;

        Ok(DynamicImage::ImageRgb8(decoded).into_rgba8())
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Option<RgbaImage> {
        match self.capture() {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("Ignoring empty camera frame: {}", e);
                None
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if self.camera.is_stream_open() {
            let _ = self.camera.stop_stream();
        }
    }
}

/// Lists attached cameras for the startup log.
pub fn log_available_cameras() {
    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => {
            info!("Found {} camera(s)", cameras.len());
            for (i, camera) in cameras.iter().enumerate() {
                info!("  [{}] {}", i, camera.human_name());
            }
        }
        Err(e) => warn!("Failed to query cameras: {}", e),
    }
}

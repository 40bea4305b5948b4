// src/main.rs
mod app;
mod ui;

use anyhow::Context;
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use air_canvas::config::AppConfig;
use air_canvas::mediapipe_bridge::MediaPipeBridge;
use air_canvas::video::{self, CameraSource};
use air_canvas::{FrameSource, LandmarkProvider};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load_or_default().context("Failed to load configuration")?;

    video::log_available_cameras();

    let source: Option<Box<dyn FrameSource>> = match CameraSource::open(&config.camera) {
        Ok(camera) => {
            info!("Drawing from camera {}", camera.index());
            Some(Box::new(camera))
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    let detector: Option<Box<dyn LandmarkProvider>> = match MediaPipeBridge::spawn(&config.detector) {
        Ok(bridge) => Some(Box::new(bridge)),
        Err(e) => {
            warn!("Drawing disabled, {}", e);
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 620.0])
            .with_min_inner_size([640.0, 400.0]),
        centered: true,
        ..Default::default()
    };

    info!("Starting air canvas");
    eframe::run_native(
        "Air Canvas",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(app::AirCanvasApp::new(&config, source, detector))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {}", e))
}

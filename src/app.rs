// src/app.rs
use eframe::egui;
use image::RgbaImage;
use tracing::info;

use air_canvas::config::AppConfig;
use air_canvas::error::DetectorError;
use air_canvas::{DrawingPipeline, FrameReport, FrameSource, GestureVerdict, LandmarkProvider, LandmarkSnapshot};

use crate::ui::{self, Theme, VideoWidget};

/// Stand-in used when the landmark detector could not be started.
pub struct NoDetector;

impl LandmarkProvider for NoDetector {
    fn detect(&mut self, _frame: &RgbaImage) -> Result<Vec<LandmarkSnapshot>, DetectorError> {
        Ok(Vec::new())
    }

    fn is_online(&self) -> bool {
        false
    }
}

pub struct AirCanvasApp {
    // Core components
    pipeline: DrawingPipeline,
    source: Option<Box<dyn FrameSource>>,
    detector: Box<dyn LandmarkProvider>,

    // UI State
    theme: Theme,
    video: VideoWidget,
    show_skeleton: bool,
    last_report: FrameReport,
}

impl AirCanvasApp {
    pub fn new(
        config: &AppConfig,
        source: Option<Box<dyn FrameSource>>,
        detector: Option<Box<dyn LandmarkProvider>>,
    ) -> Self {
        Self {
            pipeline: DrawingPipeline::new(config.drawing.clone()),
            source,
            detector: detector.unwrap_or_else(|| Box::new(NoDetector)),
            theme: Theme::default(),
            video: VideoWidget::new(),
            show_skeleton: config.detector.show_skeleton,
            last_report: FrameReport::default(),
        }
    }

    fn advance_frame(&mut self, ctx: &egui::Context) {
        let Some(source) = self.source.as_deref_mut() else {
            return;
        };
        let Some(processed) = self.pipeline.step(source, self.detector.as_mut()) else {
            return;
        };

        let composed = ui::compose_frame(
            &processed.camera,
            self.pipeline.canvas(),
            self.pipeline.palette(),
            &processed.hands,
            self.show_skeleton,
        );
        self.video.update_frame(ctx, &composed);
        self.last_report = processed.report;
    }

    fn render_status_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("status").min_width(200.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.label(egui::RichText::new("Air Canvas").heading().color(self.theme.primary));
            ui.separator();

            let pen = *self.pipeline.pen_state();
            let (label, color) = if pen.previous_point.is_some() {
                ("Drawing", self.theme.success)
            } else {
                ("Pen lifted", self.theme.text_secondary)
            };
            ui.colored_label(color, egui::RichText::new(label).size(20.0));

            ui.add_space(10.0);
            ui.label("Ink:");
            ui::draw_palette_legend(ui, self.pipeline.palette(), &pen, &self.theme);

            ui.separator();
            ui.label(format!("Hands: {}", self.last_report.hand_count()));
            for verdict in &self.last_report.verdicts {
                ui.label(match verdict {
                    GestureVerdict::OpenHand => "Open hand (clear)",
                    GestureVerdict::PenPose => "Pen pose",
                    GestureVerdict::Neutral => "Neutral",
                });
            }
            ui.label(format!("Frames: {}", self.pipeline.frames_processed()));
            if !self.detector.is_online() {
                ui.colored_label(egui::Color32::from_rgb(255, 152, 0), "Landmark detector offline");
            }

            ui.separator();
            ui.checkbox(&mut self.show_skeleton, "Show hand skeleton");
            if ui.button("Clear canvas").clicked() {
                info!("Canvas cleared from the UI");
                self.pipeline.clear_canvas();
            }

            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("Thumb below-right of index: draw\nOpen palm: clear\nEsc: quit")
                    .color(self.theme.text_secondary),
            );
        });
    }
}

impl eframe::App for AirCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        self.advance_frame(ctx);

        self.render_status_panel(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.surface))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| self.video.show(ui));
            });

        // Request repaint for continuous updates
        ctx.request_repaint();
    }
}

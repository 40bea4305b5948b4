// src/ui.rs - Compositing and widgets for the drawing window
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use image::{imageops, Rgba, RgbaImage};

use air_canvas::canvas::{draw_thick_line, fill_disc, fill_rect, Canvas};
use air_canvas::landmarks::{LandmarkSnapshot, HAND_SKELETON};
use air_canvas::palette::Palette;
use air_canvas::stroke::PenState;
use air_canvas::Color;

const SKELETON_BONE: Rgba<u8> = Rgba([0, 255, 0, 255]);
const SKELETON_JOINT: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub surface: Color32,
    pub success: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            surface: Color32::from_rgb(30, 30, 35),
            success: Color32::from_rgb(76, 175, 80),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
        }
    }
}

pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// Builds the displayed image: camera with palette (and optionally the hand
/// skeleton), blended half and half with the ink layer, mirrored for a
/// selfie view.
pub fn compose_frame(
    camera: &RgbaImage,
    canvas: &Canvas,
    palette: &Palette,
    hands: &[LandmarkSnapshot],
    show_skeleton: bool,
) -> RgbaImage {
    let mut base = camera.clone();

    if show_skeleton {
        for hand in hands {
            draw_hand_skeleton(&mut base, hand);
        }
    }
    draw_palette(&mut base, palette);

    let ink = canvas.image();
    if ink.dimensions() == base.dimensions() {
        for (out, ink) in base.pixels_mut().zip(ink.pixels()) {
            for c in 0..3 {
                out.0[c] = ((out.0[c] as u16 + ink.0[c] as u16 + 1) / 2) as u8;
            }
            out.0[3] = 255;
        }
    }

    imageops::flip_horizontal(&base)
}

pub fn draw_palette(image: &mut RgbaImage, palette: &Palette) {
    for region in palette.regions(image.width()) {
        fill_rect(image, region.min, region.max, region.color.to_rgba());
    }
}

pub fn draw_hand_skeleton(image: &mut RgbaImage, hand: &LandmarkSnapshot) {
    let (w, h) = image.dimensions();
    for &(from, to) in HAND_SKELETON.iter() {
        draw_thick_line(image, hand.pixel(from, w, h), hand.pixel(to, w, h), SKELETON_BONE, 4);
    }
    for i in 0..hand.points().len() {
        fill_disc(image, hand.pixel(i, w, h), 3, SKELETON_JOINT);
    }
}

// Custom widget for video display
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    aspect_ratio: f32,
}

impl VideoWidget {
    pub fn new() -> Self {
        Self {
            texture: None,
            aspect_ratio: 4.0 / 3.0,
        }
    }

    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &RgbaImage) {
        let size = [frame.width() as usize, frame.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        if frame.height() > 0 {
            self.aspect_ratio = frame.width() as f32 / frame.height() as f32;
        }

        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, Default::default()),
            None => {
                self.texture = Some(ctx.load_texture("air_canvas_frame", color_image, Default::default()));
            }
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let available_size = ui.available_size();
        let mut widget_width = available_size.x;
        let mut widget_height = widget_width / self.aspect_ratio;
        if widget_height > available_size.y {
            widget_height = available_size.y;
            widget_width = widget_height * self.aspect_ratio;
        }

        let size = Vec2::new(widget_width, widget_height);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            ui.painter().rect_filled(rect, egui::Rounding::same(4.0), Color32::from_rgb(50, 50, 55));
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No Video Signal",
                egui::FontId::proportional(16.0),
                Color32::from_rgb(150, 150, 155),
            );
        }
    }
}

/// Swatch list with the active ink highlighted.
pub fn draw_palette_legend(ui: &mut egui::Ui, palette: &Palette, pen: &PenState, theme: &Theme) {
    for entry in palette.entries() {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(18.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, egui::Rounding::same(3.0), to_color32(entry.color));
            if entry.color == pen.active_color {
                ui.painter().rect_stroke(rect.expand(2.0), egui::Rounding::same(4.0), Stroke::new(2.0, theme.text_primary));
                ui.colored_label(theme.text_primary, entry.name.as_str());
            } else {
                ui.colored_label(theme.text_secondary, entry.name.as_str());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use air_canvas::config::DrawingConfig;
    use air_canvas::PixelPoint;

    fn gray_frame(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([100, 100, 100, 255]))
    }

    #[test]
    fn blend_halves_camera_and_ink() {
        let palette = Palette::from_config(&DrawingConfig::default());
        let mut canvas = Canvas::new(640, 480);
        canvas.draw_line(PixelPoint::new(10, 300), PixelPoint::new(10, 300), Color(200, 0, 0), 5);

        let out = compose_frame(&gray_frame(640, 480), &canvas, &palette, &[], false);
        // blank ink darkens the camera
        assert_eq!(out.get_pixel(320, 400).0, [50, 50, 50, 255]);
        // mirrored: canvas x = 10 shows up at x = 629
        assert_eq!(out.get_pixel(629, 300).0, [150, 50, 50, 255]);
    }

    #[test]
    fn palette_is_painted_before_mirroring() {
        let palette = Palette::from_config(&DrawingConfig::default());
        let canvas = Canvas::new(640, 480);
        let out = compose_frame(&gray_frame(640, 480), &canvas, &palette, &[], false);
        // red swatch spans x in [100, 200] unmirrored, so [439, 539] on screen
        assert_eq!(out.get_pixel(639 - 150, 60).0, [128, 0, 0, 255]);
    }

    #[test]
    fn mismatched_canvas_is_not_blended() {
        let palette = Palette::from_config(&DrawingConfig::default());
        let canvas = Canvas::new(10, 10);
        let out = compose_frame(&gray_frame(640, 480), &canvas, &palette, &[], false);
        assert_eq!(out.get_pixel(320, 400).0, [100, 100, 100, 255]);
    }

    #[test]
    fn skeleton_marks_joints() {
        let mut image = gray_frame(100, 100);
        let hand = LandmarkSnapshot::default();
        draw_hand_skeleton(&mut image, &hand);
        assert_eq!(image.get_pixel(50, 50).0, [255, 0, 0, 255]);
    }
}

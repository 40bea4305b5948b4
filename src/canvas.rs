// src/canvas.rs
//! Persistent ink layer plus the small raster primitives used to paint it.
//!
//! All primitives clip against the image bounds, so callers may pass points
//! anywhere in `i32` space.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::landmarks::PixelPoint;
use crate::palette::Color;

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Reallocates a blank buffer when the frame size changed.
    /// Returns `true` if the canvas was replaced.
    pub fn ensure_size(&mut self, width: u32, height: u32) -> bool {
        if self.image.dimensions() == (width, height) {
            return false;
        }
        debug!(
            from = ?self.image.dimensions(),
            to = ?(width, height),
            "Resizing canvas"
        );
        self.image = RgbaImage::new(width, height);
        true
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Color, thickness: u32) {
        draw_thick_line(&mut self.image, from, to, color.to_rgba(), thickness);
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0 == [0, 0, 0, 0])
    }
}

/// Paints a round-capped segment `thickness` pixels wide.
pub fn draw_thick_line(
    image: &mut RgbaImage,
    from: PixelPoint,
    to: PixelPoint,
    color: Rgba<u8>,
    thickness: u32,
) {
    let radius = thickness.max(1) as f32 / 2.0;
    let reach = radius.ceil() as i32;

    let (ax, ay) = (from.x as f32, from.y as f32);
    let (bx, by) = (to.x as f32, to.y as f32);
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;

    let Some((x0, y0, x1, y1)) = clip_box(
        image,
        from.x.min(to.x).saturating_sub(reach),
        from.y.min(to.y).saturating_sub(reach),
        from.x.max(to.x).saturating_add(reach),
        from.y.max(to.y).saturating_add(reach),
    ) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32, y as f32);
            let t = if len2 == 0.0 {
                0.0
            } else {
                (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
            };
            let (cx, cy) = (ax + t * dx - px, ay + t * dy - py);
            if cx * cx + cy * cy <= radius * radius {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Fills the rectangle spanned by two inclusive corners.
pub fn fill_rect(image: &mut RgbaImage, min: PixelPoint, max: PixelPoint, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = clip_box(image, min.x, min.y, max.x, max.y) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

pub fn fill_disc(image: &mut RgbaImage, center: PixelPoint, radius: i32, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = clip_box(
        image,
        center.x.saturating_sub(radius),
        center.y.saturating_sub(radius),
        center.x.saturating_add(radius),
        center.y.saturating_add(radius),
    ) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = (x - center.x, y - center.y);
            if dx * dx + dy * dy <= radius * radius {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Intersects an inclusive box with the image, `None` if nothing is left.
fn clip_box(image: &RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let (x0, y0) = (x0.max(0), y0.max(0));
    let (x1, y1) = (x1.min(w - 1), y1.min(h - 1));
    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color(255, 0, 0);

    fn p(x: i32, y: i32) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    fn inked(canvas: &Canvas, x: u32, y: u32) -> bool {
        canvas.image().get_pixel(x, y).0 != [0, 0, 0, 0]
    }

    #[test]
    fn starts_blank() {
        let canvas = Canvas::new(64, 48);
        assert_eq!((canvas.width(), canvas.height()), (64, 48));
        assert!(canvas.is_blank());
    }

    #[test]
    fn line_covers_endpoints_and_middle() {
        let mut canvas = Canvas::new(100, 100);
        canvas.draw_line(p(10, 10), p(90, 50), RED, 5);
        assert!(inked(&canvas, 10, 10));
        assert!(inked(&canvas, 90, 50));
        assert!(inked(&canvas, 50, 30));
        assert_eq!(canvas.image().get_pixel(50, 30).0, [255, 0, 0, 255]);
        assert!(!inked(&canvas, 50, 60));
    }

    #[test]
    fn thickness_is_respected() {
        let mut canvas = Canvas::new(100, 100);
        canvas.draw_line(p(10, 50), p(90, 50), RED, 5);
        assert!(inked(&canvas, 50, 48));
        assert!(inked(&canvas, 50, 52));
        assert!(!inked(&canvas, 50, 47));
        assert!(!inked(&canvas, 50, 53));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut canvas = Canvas::new(40, 30);
        canvas.draw_line(p(0, 0), p(39, 29), RED, 5);
        canvas.clear();
        let once = canvas.image().clone();
        canvas.clear();
        assert_eq!(canvas.image(), &once);
        assert!(canvas.is_blank());
        assert_eq!((canvas.width(), canvas.height()), (40, 30));
    }

    #[test]
    fn resize_reallocates_blank() {
        let mut canvas = Canvas::new(40, 30);
        canvas.draw_line(p(0, 0), p(39, 29), RED, 5);
        assert!(canvas.ensure_size(80, 60));
        assert_eq!((canvas.width(), canvas.height()), (80, 60));
        assert!(canvas.is_blank());
    }

    #[test]
    fn same_size_keeps_ink() {
        let mut canvas = Canvas::new(40, 30);
        canvas.draw_line(p(5, 5), p(20, 5), RED, 5);
        assert!(!canvas.ensure_size(40, 30));
        assert!(inked(&canvas, 10, 5));
    }

    #[test]
    fn out_of_bounds_segments_are_clipped() {
        let mut canvas = Canvas::new(50, 50);
        canvas.draw_line(p(-100, 25), p(200, 25), RED, 5);
        assert!(inked(&canvas, 0, 25));
        assert!(inked(&canvas, 49, 25));

        let mut outside = Canvas::new(50, 50);
        outside.draw_line(p(-100, -100), p(-10, -60), RED, 5);
        outside.draw_line(p(60, 60), p(500, 90), RED, 5);
        assert!(outside.is_blank());
    }

    #[test]
    fn zero_length_line_is_a_dot() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_line(p(10, 10), p(10, 10), RED, 5);
        assert!(inked(&canvas, 10, 10));
        assert!(inked(&canvas, 12, 10));
        assert!(!inked(&canvas, 13, 10));
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let mut image = RgbaImage::new(10, 10);
        draw_thick_line(&mut image, p(i32::MIN, i32::MIN), p(-100, -100), RED.to_rgba(), 5);
        draw_thick_line(&mut image, p(i32::MAX, 0), p(i32::MAX, 9), RED.to_rgba(), 5);
        fill_disc(&mut image, p(i32::MAX, i32::MIN), 3, RED.to_rgba());
        assert!(image.pixels().all(|px| px.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn rect_and_disc_clip() {
        let mut image = RgbaImage::new(10, 10);
        fill_rect(&mut image, p(-5, -5), p(2, 2), Rgba([1, 2, 3, 255]));
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [1, 2, 3, 255]);
        assert_eq!(image.get_pixel(3, 3).0, [0, 0, 0, 0]);

        fill_disc(&mut image, p(9, 9), 3, Rgba([9, 9, 9, 255]));
        assert_eq!(image.get_pixel(9, 9).0, [9, 9, 9, 255]);
        assert_eq!(image.get_pixel(6, 9).0, [9, 9, 9, 255]);
        assert_eq!(image.get_pixel(6, 6).0, [0, 0, 0, 0]);
    }
}

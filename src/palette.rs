// src/palette.rs
use serde::{Deserialize, Serialize};

use crate::config::DrawingConfig;
use crate::landmarks::PixelPoint;

/// Opaque RGB ink color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.0, self.1, self.2, 255])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Screen rectangle of one palette swatch. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteRegion {
    pub color: Color,
    pub min: PixelPoint,
    pub max: PixelPoint,
}

impl PaletteRegion {
    pub fn contains(&self, point: PixelPoint) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
}

/// Row of color swatches along the top edge of the frame. Layout depends on
/// the frame width only, so it is recomputed per frame.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    box_size: i32,
    spacing: i32,
    origin_offset: i32,
    top: i32,
}

impl Palette {
    pub fn from_config(config: &DrawingConfig) -> Self {
        Self {
            entries: config.palette.clone(),
            box_size: config.box_size as i32,
            spacing: config.spacing as i32,
            origin_offset: config.origin_offset,
            top: config.top,
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Color the pen starts with.
    pub fn default_color(&self) -> Color {
        self.entries.first().map(|e| e.color).unwrap_or(Color(255, 0, 0))
    }

    pub fn regions(&self, frame_width: u32) -> impl Iterator<Item = PaletteRegion> + '_ {
        let base_x = frame_width as i32 - self.origin_offset;
        let stride = self.box_size + self.spacing;
        self.entries.iter().enumerate().map(move |(i, entry)| {
            let x = base_x + i as i32 * stride;
            PaletteRegion {
                color: entry.color,
                min: PixelPoint::new(x, self.top),
                max: PixelPoint::new(x + self.box_size, self.top + self.box_size),
            }
        })
    }

    /// Color whose swatch contains `point`, if any.
    pub fn select(&self, point: PixelPoint, frame_width: u32) -> Option<Color> {
        self.regions(frame_width)
            .filter(|region| region.contains(point))
            .last()
            .map(|region| region.color)
    }
}

// src/landmarks.rs
//! Per-hand landmark snapshots as produced by the hand detector.
//!
//! Coordinates are normalized to the frame: `x` in `[0, 1]` across the width,
//! `y` in `[0, 1]` down the height. `z` is relative depth and is carried along
//! but never used for drawing.

use nalgebra::{Point2, Point3};

use crate::error::SnapshotError;

pub const LANDMARK_COUNT: usize = 21;

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// (tip, proximal joint) for each of the five fingers, thumb first.
pub const FINGER_TIPS_AND_BASES: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_CMC),
    (INDEX_TIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_MCP),
    (RING_TIP, RING_MCP),
    (PINKY_TIP, PINKY_MCP),
];

/// Bone connections used for the skeleton overlay.
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

/// Pixel position inside a frame. Truncated from normalized coordinates.
pub type PixelPoint = Point2<i32>;

/// How many frame sizes away from the frame a joint may land in pixel space.
const PIXEL_MARGIN: f32 = 4.0;
const MAX_PIXEL: f32 = 1.0e6;

/// One detected hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSnapshot {
    points: [Point3<f32>; LANDMARK_COUNT],
    /// "Left" / "Right" as reported by the detector.
    pub handedness: Option<String>,
    pub score: Option<f32>,
}

impl LandmarkSnapshot {
    pub fn new(points: [Point3<f32>; LANDMARK_COUNT]) -> Self {
        Self {
            points,
            handedness: None,
            score: None,
        }
    }

    pub fn from_slice(points: &[[f32; 3]]) -> Result<Self, SnapshotError> {
        if points.len() != LANDMARK_COUNT {
            return Err(SnapshotError::LandmarkCount(points.len()));
        }

        let mut snapshot = Self::default();
        for (i, (slot, p)) in snapshot.points.iter_mut().zip(points).enumerate() {
            if !p.iter().all(|v| v.is_finite()) {
                return Err(SnapshotError::NonFinite(i));
            }
            *slot = Point3::new(p[0], p[1], p[2]);
        }
        Ok(snapshot)
    }

    /// Returns a copy with joint `index` moved to `(x, y)`.
    pub fn with_joint(mut self, index: usize, x: f32, y: f32) -> Self {
        self.points[index].x = x;
        self.points[index].y = y;
        self
    }

    pub fn joint(&self, index: usize) -> Point3<f32> {
        self.points[index]
    }

    pub fn points(&self) -> &[Point3<f32>; LANDMARK_COUNT] {
        &self.points
    }

    /// Vertical pixel coordinate of a joint, left unrounded.
    pub fn pixel_y(&self, index: usize, frame_height: u32) -> f32 {
        self.points[index].y * frame_height as f32
    }

    /// Pixel position of a joint, truncated. Joints far outside the frame are
    /// pulled in to a few frame sizes away so pixel math cannot overflow.
    pub fn pixel(&self, index: usize, frame_width: u32, frame_height: u32) -> PixelPoint {
        let p = &self.points[index];
        PixelPoint::new(to_pixel(p.x, frame_width), to_pixel(p.y, frame_height))
    }
}

fn to_pixel(normalized: f32, dimension: u32) -> i32 {
    let limit = (dimension as f32 * PIXEL_MARGIN).min(MAX_PIXEL);
    (normalized * dimension as f32).clamp(-limit, limit) as i32
}

impl Default for LandmarkSnapshot {
    fn default() -> Self {
        Self::new([Point3::new(0.5, 0.5, 0.0); LANDMARK_COUNT])
    }
}

// src/gesture.rs
//! Per-frame hand pose classification. Memoryless: every frame is judged on
//! its own landmarks.

use crate::config::GestureThresholds;
use crate::landmarks::{LandmarkSnapshot, FINGER_TIPS_AND_BASES, INDEX_TIP, THUMB_TIP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureVerdict {
    /// All five fingers extended upwards. Clears the canvas.
    OpenHand,
    /// Thumb tip below and to the right of the index tip, far enough apart.
    PenPose,
    Neutral,
}

pub fn classify(
    snapshot: &LandmarkSnapshot,
    frame_width: u32,
    frame_height: u32,
    thresholds: &GestureThresholds,
) -> GestureVerdict {
    if is_open_hand(snapshot, frame_height) {
        GestureVerdict::OpenHand
    } else if is_pen_pose(snapshot, frame_width, frame_height, thresholds) {
        GestureVerdict::PenPose
    } else {
        GestureVerdict::Neutral
    }
}

/// Every fingertip sits strictly above its base joint (image y grows downwards).
pub fn is_open_hand(snapshot: &LandmarkSnapshot, frame_height: u32) -> bool {
    FINGER_TIPS_AND_BASES.iter().all(|&(tip, base)| {
        snapshot.pixel_y(tip, frame_height) < snapshot.pixel_y(base, frame_height)
    })
}

pub fn is_pen_pose(
    snapshot: &LandmarkSnapshot,
    frame_width: u32,
    frame_height: u32,
    thresholds: &GestureThresholds,
) -> bool {
    let index = snapshot.pixel(INDEX_TIP, frame_width, frame_height);
    let thumb = snapshot.pixel(THUMB_TIP, frame_width, frame_height);

    let dx = (i64::from(index.x) - i64::from(thumb.x)).abs();
    let dy = (i64::from(index.y) - i64::from(thumb.y)).abs();

    dx > i64::from(thresholds.min_dx)
        && dy > i64::from(thresholds.min_dy)
        && thumb.y > index.y
        && thumb.x > index.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::*;

    const W: u32 = 640;
    const H: u32 = 480;

    /// Fingers curled: every tip below its base joint.
    fn fist() -> LandmarkSnapshot {
        FINGER_TIPS_AND_BASES
            .iter()
            .fold(LandmarkSnapshot::default(), |s, &(tip, base)| {
                s.with_joint(tip, 0.5, 0.7).with_joint(base, 0.5, 0.6)
            })
    }

    fn open_hand() -> LandmarkSnapshot {
        FINGER_TIPS_AND_BASES
            .iter()
            .fold(LandmarkSnapshot::default(), |s, &(tip, base)| {
                s.with_joint(tip, 0.5, 0.2).with_joint(base, 0.5, 0.6)
            })
    }

    /// Index at (160, 120), thumb at (320, 240) in a 640x480 frame.
    fn pen_pose() -> LandmarkSnapshot {
        fist().with_joint(INDEX_TIP, 0.25, 0.25).with_joint(THUMB_TIP, 0.5, 0.5)
    }

    fn thresholds() -> GestureThresholds {
        GestureThresholds::default()
    }

    #[test]
    fn all_fingers_up_is_open_hand() {
        assert_eq!(classify(&open_hand(), W, H, &thresholds()), GestureVerdict::OpenHand);
    }

    #[test]
    fn one_curled_finger_is_not_open_hand() {
        let snapshot = open_hand().with_joint(PINKY_TIP, 0.5, 0.6);
        assert!(!is_open_hand(&snapshot, H));
    }

    #[test]
    fn open_hand_wins_over_pen_pose_geometry() {
        // Index and thumb tips satisfy the pen geometry, yet all tips stay above their bases.
        let snapshot = open_hand()
            .with_joint(INDEX_TIP, 0.25, 0.1)
            .with_joint(THUMB_TIP, 0.5, 0.3);
        assert!(is_pen_pose(&snapshot, W, H, &thresholds()));
        assert_eq!(classify(&snapshot, W, H, &thresholds()), GestureVerdict::OpenHand);
    }

    #[test]
    fn thumb_below_right_of_index_is_pen_pose() {
        assert_eq!(classify(&pen_pose(), W, H, &thresholds()), GestureVerdict::PenPose);
    }

    #[test]
    fn thumb_left_of_index_is_neutral() {
        let snapshot = pen_pose().with_joint(THUMB_TIP, 0.1, 0.5);
        assert_eq!(classify(&snapshot, W, H, &thresholds()), GestureVerdict::Neutral);
    }

    #[test]
    fn thumb_above_index_is_neutral() {
        let snapshot = pen_pose().with_joint(THUMB_TIP, 0.5, 0.1);
        assert_eq!(classify(&snapshot, W, H, &thresholds()), GestureVerdict::Neutral);
    }

    #[test]
    fn threshold_is_strict_in_pixels() {
        // dx = 50 exactly: index x = 100, thumb x = 150
        let snapshot = fist()
            .with_joint(INDEX_TIP, 100.0 / 640.0, 0.25)
            .with_joint(THUMB_TIP, 150.0 / 640.0, 0.75);
        assert_eq!(classify(&snapshot, W, H, &thresholds()), GestureVerdict::Neutral);

        let snapshot = snapshot.with_joint(THUMB_TIP, 152.0 / 640.0, 0.75);
        assert_eq!(classify(&snapshot, W, H, &thresholds()), GestureVerdict::PenPose);
    }

    #[test]
    fn thresholds_scale_with_frame_size() {
        // 0.05 of width is 32px at 640 wide and 96px at 1920 wide.
        let snapshot = fist()
            .with_joint(INDEX_TIP, 0.40, 0.20)
            .with_joint(THUMB_TIP, 0.45, 0.60);
        assert_eq!(classify(&snapshot, 640, 480, &thresholds()), GestureVerdict::Neutral);
        assert_eq!(classify(&snapshot, 1920, 1080, &thresholds()), GestureVerdict::PenPose);
    }

    #[test]
    fn configured_thresholds_apply() {
        let strict = GestureThresholds { min_dx: 200, min_dy: 50 };
        assert_eq!(classify(&pen_pose(), W, H, &strict), GestureVerdict::Neutral);
    }

    #[test]
    fn wild_coordinates_classify_without_overflow() {
        let hand = fist()
            .with_joint(INDEX_TIP, -1.0e12, -1.0e12)
            .with_joint(THUMB_TIP, 1.0e12, 1.0e12);
        assert_eq!(classify(&hand, W, H, &thresholds()), GestureVerdict::PenPose);

        let backwards = fist()
            .with_joint(INDEX_TIP, 1.0e12, 1.0e12)
            .with_joint(THUMB_TIP, -1.0e12, -1.0e12);
        assert_eq!(classify(&backwards, W, H, &thresholds()), GestureVerdict::Neutral);
    }
}

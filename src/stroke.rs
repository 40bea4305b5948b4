// src/stroke.rs
use tracing::debug;

use crate::gesture::GestureVerdict;
use crate::landmarks::PixelPoint;
use crate::palette::Color;

/// Pen state carried from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenState {
    /// Last pen-tip position while drawing. `None` means the pen is lifted.
    pub previous_point: Option<PixelPoint>,
    pub active_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: PixelPoint,
    pub to: PixelPoint,
    pub color: Color,
}

/// What the tracker decided for one hand observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeAction {
    /// Pen lifted, nothing drawn.
    Lift,
    /// First pen frame after a lift: remembers the tip, draws nothing.
    Anchor(PixelPoint),
    /// Continue the stroke with one segment.
    Extend(Segment),
    /// Wipe the canvas. The pen is lifted as well.
    Clear,
}

pub struct StrokeTracker {
    state: PenState,
    open_hand_clears: bool,
}

impl StrokeTracker {
    pub fn new(initial_color: Color, open_hand_clears: bool) -> Self {
        Self {
            state: PenState {
                previous_point: None,
                active_color: initial_color,
            },
            open_hand_clears,
        }
    }

    pub fn state(&self) -> &PenState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.previous_point.is_some()
    }

    pub fn select_color(&mut self, color: Color) {
        if color != self.state.active_color {
            debug!(?color, "Active color changed");
        }
        self.state.active_color = color;
    }

    /// No hand in this frame.
    pub fn hand_lost(&mut self) -> StrokeAction {
        self.state.previous_point = None;
        StrokeAction::Lift
    }

    pub fn advance(&mut self, verdict: GestureVerdict, tip: PixelPoint) -> StrokeAction {
        match verdict {
            GestureVerdict::OpenHand => {
                self.state.previous_point = None;
                if self.open_hand_clears {
                    StrokeAction::Clear
                } else {
                    StrokeAction::Lift
                }
            }
            GestureVerdict::PenPose => {
                let action = match self.state.previous_point {
                    Some(from) => StrokeAction::Extend(Segment {
                        from,
                        to: tip,
                        color: self.state.active_color,
                    }),
                    None => StrokeAction::Anchor(tip),
                };
                self.state.previous_point = Some(tip);
                action
            }
            GestureVerdict::Neutral => {
                self.state.previous_point = None;
                StrokeAction::Lift
            }
        }
    }
}

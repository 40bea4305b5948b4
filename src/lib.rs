//! # air_canvas
//!
//! Turns a webcam into a drawing surface. A hand landmark detector reports
//! 21 joints per hand each frame; from those the pipeline decides whether the
//! hand is holding an imaginary pen, which ink color is picked, and when to
//! wipe the canvas.
//!
//! | Hand pose | Effect |
//! |---|---|
//! | Thumb tip well below and right of the index tip | Draw with the index tip |
//! | All five fingers extended upwards | Clear the canvas |
//! | Index tip over a palette swatch | Switch ink color |
//! | Anything else, or no hand | Lift the pen |

pub mod canvas;
pub mod config;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod mediapipe_bridge;
pub mod palette;
pub mod pipeline;
pub mod stroke;
pub mod video;

pub use canvas::Canvas;
pub use config::{AppConfig, DrawingConfig};
pub use gesture::{classify, GestureVerdict};
pub use landmarks::{LandmarkSnapshot, PixelPoint};
pub use palette::{Color, Palette};
pub use pipeline::{DrawingPipeline, FrameReport, FrameSource, LandmarkProvider, ProcessedFrame};
pub use stroke::{PenState, StrokeAction, StrokeTracker};

//! Engine — the pure motion/render core.
//!
//! Turns a viewport, a measured text extent and the current palette colour
//! into `FrameDescription`s, one step at a time.
//!
//! The engine understands geometry, collisions and colour cycling.
//! It never deals with terminals, clocks, or randomness.

pub mod frame;
pub mod motion;
pub mod palette;
pub mod scaler;

pub use frame::FrameProducer;
pub use motion::{Bounce, MotionSimulator};
pub use palette::Palette;
pub use scaler::ViewportScaler;

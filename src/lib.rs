//! Bouncing-text screensaver.
//!
//! A display string drifts across the terminal at constant velocity,
//! reflects off the edges, changes colour on every bounce and is drawn with
//! a layered glow. The pipeline is:
//!
//! - `engine` — scaling, motion, palette and frame descriptions (pure)
//! - `controller` — lifecycle state machine over an injected scheduler
//! - `renderer` — frame descriptions to cell grids and diffs
//! - `player` / `recorder` — terminal and headless hosts

pub mod config;
pub mod controller;
pub mod engine;
pub mod logging;
pub mod menubar;
pub mod player;
pub mod recorder;
pub mod renderer;
pub mod types;

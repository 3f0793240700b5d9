//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events
//! - Frame pacing

pub mod input;
pub mod time;

pub use input::{InputEvent, InputSource, NoInput, ScriptedInput};
pub use time::FrameClock;

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (fixed 60 Hz steps from arbitrary display refresh)

pub mod time;

pub use time::FrameTimer;

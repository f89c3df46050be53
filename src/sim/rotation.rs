//! Central capybara spin

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_degrees;

/// How fast the central capybara spins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationModel {
    /// Spin speed grows with (t / ramp)^2 up to `TERMINAL_SPIN` at the ramp time
    Quadratic,
    /// Spin per frame proportional to the current spawn rate
    RateProportional,
}

impl RotationModel {
    /// Degrees to add this frame
    pub fn increment(&self, elapsed: f64, spawn_rate: f64) -> f64 {
        match self {
            RotationModel::Quadratic => {
                let ramp = elapsed.max(0.0) / SPIN_RAMP_SECS;
                TERMINAL_SPIN * ramp * ramp / FPS as f64
            }
            RotationModel::RateProportional => spawn_rate.max(0.0) * SPIN_PER_RATE,
        }
    }

    /// Advance `angle` by one frame, wrapped into [0, 360)
    pub fn advance(&self, angle: f64, elapsed: f64, spawn_rate: f64) -> f64 {
        let increment = self.increment(elapsed, spawn_rate);
        if !increment.is_finite() {
            // Past the point of meaningful spin; hold the pose
            return wrap_degrees(angle);
        }
        wrap_degrees(angle + increment)
    }
}

//! Spawn scheduling
//!
//! Once per frame the scheduler turns the round's elapsed time into a spawn
//! probability and compares it against a uniform draw in [0, 1).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Variant;
use super::sprite::Sprite;
use crate::consts::*;

/// How the spawn probability grows over a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// `CLASSIC_INITIAL_RATE * 2^floor(t)` spawns per second, spread over the frame rate
    PerSecond,
    /// `CONTINUOUS_INITIAL_RATE * 2^t` chance per frame, no flooring
    Continuous,
}

impl SpawnPolicy {
    /// Spawn rate at `elapsed` seconds
    ///
    /// Spawns per second for `PerSecond`, raw per-frame chance for `Continuous`.
    pub fn rate(&self, elapsed: f64) -> f64 {
        let elapsed = elapsed.max(0.0);
        match self {
            SpawnPolicy::PerSecond => {
                let whole_seconds = elapsed.floor();
                CLASSIC_INITIAL_RATE * CLASSIC_RATE_MULTIPLIER.powf(whole_seconds)
            }
            SpawnPolicy::Continuous => CONTINUOUS_INITIAL_RATE * 2f64.powf(elapsed),
        }
    }

    /// Chance of a spawn this frame, capped at 1
    pub fn probability(&self, elapsed: f64) -> f64 {
        let p = match self {
            SpawnPolicy::PerSecond => self.rate(elapsed) / FPS as f64,
            SpawnPolicy::Continuous => self.rate(elapsed),
        };
        p.min(1.0)
    }

    /// Spawn when the draw falls strictly below the probability
    #[inline]
    pub fn should_spawn(&self, elapsed: f64, draw: f64) -> bool {
        draw < self.probability(elapsed)
    }

    /// Infimum of the elapsed times at which a fixed `draw` triggers a spawn
    ///
    /// Every frame after the returned time spawns. At the time itself the
    /// continuous policy can tie (`probability == draw`), which does not spawn.
    /// Returns `None` when the draw can never be beaten (draw >= 1).
    #[cfg(test)]
    pub fn first_spawn_time(&self, draw: f64) -> Option<f64> {
        if draw >= 1.0 {
            return None;
        }
        let draw = draw.max(0.0);
        match self {
            SpawnPolicy::PerSecond => {
                let needed_rate = draw * FPS as f64 / CLASSIC_INITIAL_RATE;
                if needed_rate < 1.0 {
                    return Some(0.0);
                }
                // Smallest whole second whose rate strictly beats the draw
                let mut secs = needed_rate.log(CLASSIC_RATE_MULTIPLIER).floor();
                while self.rate(secs) / FPS as f64 <= draw {
                    secs += 1.0;
                }
                Some(secs)
            }
            SpawnPolicy::Continuous => {
                if draw < CONTINUOUS_INITIAL_RATE {
                    return Some(0.0);
                }
                Some((draw / CONTINUOUS_INITIAL_RATE).log2())
            }
        }
    }
}

/// Eject a new capybara from `center` with random heading, speed and (for the
/// classic variant) scale
pub fn spawn_sprite<R: Rng + ?Sized>(variant: Variant, center: Vec2, rng: &mut R) -> Sprite {
    let scale = if variant.scales_sprites() {
        rng.random_range(SPRITE_SCALE_MIN..=SPRITE_SCALE_MAX)
    } else {
        1.0
    };
    // Sizes are whole pixels
    let edge = (SPRITE_BASE_SIZE * scale).floor();
    let direction = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = rng.random_range(SPRITE_SPEED_MIN..=SPRITE_SPEED_MAX);

    Sprite::centered(center, Vec2::splat(edge), direction, speed)
}

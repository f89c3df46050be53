//! Ejected capybara sprites and their straight-line motion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::direction_vector;

/// An ejected capybara
///
/// `pos` is the top-left corner of the bounding box; `size` its extent.
/// Sprites never leave the round once spawned, even when off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub size: Vec2,
    /// Heading in radians
    pub direction: f32,
    /// Units per frame
    pub speed: f32,
}

impl Sprite {
    /// Create a sprite whose bounding box is centered on `center`
    pub fn centered(center: Vec2, size: Vec2, direction: f32, speed: f32) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
            direction,
            speed,
        }
    }

    /// Per-frame displacement
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        direction_vector(self.direction) * self.speed
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Move one frame along the heading
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.velocity();
    }

    /// Closed-form position after `frames` frames from the current one
    pub fn position_after(&self, frames: u32) -> Vec2 {
        self.pos + self.velocity() * frames as f32
    }
}

/// Advance every live sprite by one frame
pub fn advance_all(sprites: &mut [Sprite]) {
    for sprite in sprites {
        sprite.advance();
    }
}

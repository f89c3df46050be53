//! Pointer vs. capybara hit testing
//!
//! Boxes are half-open: the left/top edges belong to a sprite, the right/bottom
//! edges do not. A linear scan in spawn order is all the round ever needs.

use glam::Vec2;

use super::sprite::Sprite;

/// Check whether `point` lies in the half-open box `[min, min + size)`
#[inline]
pub fn point_in_rect(point: Vec2, min: Vec2, size: Vec2) -> bool {
    let max = min + size;
    point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
}

impl Sprite {
    /// Pointer hit test against this sprite's current bounding box
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_rect(point, self.pos, self.size)
    }
}

/// Index of the first sprite (in spawn order) under the pointer
pub fn first_hit(sprites: &[Sprite], pointer: Vec2) -> Option<usize> {
    sprites.iter().position(|sprite| sprite.contains(pointer))
}

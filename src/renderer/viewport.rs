//! Mapping between the fixed 800x600 play field and the actual surface
//!
//! The play field is letterboxed: scaled uniformly to fit, centered, with the
//! remaining bands left as background.

use glam::Vec2;

use crate::clamp_to_screen;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface size in pixels (physical or CSS, as long as inputs match)
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width.max(1.0), height.max(1.0)),
        }
    }

    /// Uniform play field -> surface scale
    pub fn scale(&self) -> f32 {
        (self.size.x / SCREEN_WIDTH).min(self.size.y / SCREEN_HEIGHT)
    }

    /// Surface offset of the play field's top-left corner
    pub fn offset(&self) -> Vec2 {
        (self.size - Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) * self.scale()) / 2.0
    }

    /// Play field point -> surface pixel
    pub fn to_surface(&self, p: Vec2) -> Vec2 {
        self.offset() + p * self.scale()
    }

    /// Surface pixel (e.g. a mouse event offset) -> play field point
    pub fn to_field(&self, p: Vec2) -> Vec2 {
        (p - self.offset()) / self.scale()
    }

    /// Pointer position on the surface -> play field point
    ///
    /// Points in the letterbox bands are pulled onto the field edge, so the
    /// pointer can only touch what is drawn.
    pub fn pointer_to_field(&self, p: Vec2) -> Vec2 {
        clamp_to_screen(self.to_field(p))
    }

    /// Play field point -> normalized device coordinates (y up)
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let s = self.to_surface(p);
        Vec2::new(s.x / self.size.x * 2.0 - 1.0, 1.0 - s.y / self.size.y * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), Vec2::ZERO);
        assert_eq!(vp.to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn test_wide_surface_is_pillarboxed() {
        let vp = Viewport::new(1600.0, 600.0);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), Vec2::new(400.0, 0.0));
        assert_eq!(vp.to_field(Vec2::new(400.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn test_band_pointer_lands_on_field_edge() {
        // 400px bands left and right
        let vp = Viewport::new(1600.0, 600.0);
        assert_eq!(vp.to_field(Vec2::new(100.0, 300.0)), Vec2::new(-300.0, 300.0));
        assert_eq!(vp.pointer_to_field(Vec2::new(100.0, 300.0)), Vec2::new(0.0, 300.0));
        assert_eq!(vp.pointer_to_field(Vec2::new(1500.0, 300.0)), Vec2::new(799.0, 300.0));
        // Exactly on the band edge
        assert_eq!(vp.pointer_to_field(Vec2::new(400.0, 0.0)), Vec2::ZERO);

        // 300px bands top and bottom
        let vp = Viewport::new(800.0, 1200.0);
        assert_eq!(vp.pointer_to_field(Vec2::new(400.0, 100.0)), Vec2::new(400.0, 0.0));
        assert_eq!(vp.pointer_to_field(Vec2::new(400.0, 1150.0)), Vec2::new(400.0, 599.0));
    }

    #[test]
    fn test_pointer_inside_field_unchanged() {
        let vp = Viewport::new(1600.0, 600.0);
        assert_eq!(vp.pointer_to_field(Vec2::new(800.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_field_surface_inverse() {
        let vp = Viewport::new(1024.0, 1024.0);
        let p = Vec2::new(123.0, 456.0);
        assert!((vp.to_field(vp.to_surface(p)) - p).length() < 1e-3);
    }
}

//! Build the frame's triangle list from the round

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{CENTRAL_SIZE, ROUND_CENTER, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{RoundState, Sprite, point_in_rect};

/// Whether any part of a sprite is on screen
fn visible(sprite: &Sprite) -> bool {
    let field = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    // Grow the field by the sprite so partially visible boxes count
    point_in_rect(sprite.pos + sprite.size, Vec2::ZERO, field + sprite.size)
}

/// Vertices for the whole play field
///
/// `show_pointer` draws a marker where the simulation thinks the pointer is
/// (demo mode, where the real cursor does not move).
pub fn build(round: &RoundState, show_pointer: bool) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    // Positive angles spin counter-clockwise on screen (y down)
    let spin = -(round.angle as f32).to_radians();
    vertices.extend(shapes::capybara(ROUND_CENTER, Vec2::splat(CENTRAL_SIZE), spin));

    for sprite in round.sprites.iter().filter(|s| visible(s)) {
        vertices.extend(shapes::capybara(sprite.center(), sprite.size, 0.0));
    }

    if show_pointer {
        if let Some(pointer) = round.pointer {
            vertices.extend(shapes::ring(pointer, 5.0, 8.0, colors::POINTER, 16));
        }
    }

    if round.is_over() {
        vertices.extend(shapes::quad(
            Vec2::ZERO,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            colors::GAME_OVER_VEIL,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::renderer::Viewport;
    use crate::sim::{Phase, TickInput, Variant, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sprite_at(pos: Vec2) -> Sprite {
        Sprite {
            pos,
            size: Vec2::splat(45.0),
            direction: 0.0,
            speed: 2.0,
        }
    }

    #[test]
    fn test_offscreen_sprites_culled() {
        let mut round = RoundState::new(Variant::Classic, 0.0);
        let central = build(&round, false).len();

        round.sprites.push(sprite_at(Vec2::new(100.0, 100.0)));
        let one = build(&round, false).len();
        assert!(one > central);

        round.sprites.push(sprite_at(Vec2::new(-500.0, 100.0)));
        round.sprites.push(sprite_at(Vec2::new(100.0, 5000.0)));
        assert_eq!(build(&round, false).len(), one);

        // Half out of the left edge is still drawn
        round.sprites.push(sprite_at(Vec2::new(-20.0, 100.0)));
        assert!(build(&round, false).len() > one);
    }

    #[test]
    fn test_game_over_adds_veil() {
        let mut round = RoundState::new(Variant::Classic, 0.0);
        let playing = build(&round, false).len();
        round.phase = Phase::GameOver;
        assert_eq!(build(&round, false).len(), playing + 6);
    }

    #[test]
    fn test_pointer_marker_only_when_asked() {
        let mut round = RoundState::new(Variant::Classic, 0.0);
        round.pointer = Some(Vec2::new(10.0, 10.0));
        assert!(build(&round, true).len() > build(&round, false).len());
    }

    #[test]
    fn test_band_pointer_cannot_hit_culled_sprite() {
        let mut round = RoundState::new(Variant::Classic, 0.0);
        let central = build(&round, false).len();

        // Flying left, well past the field edge
        let stray = Sprite {
            pos: Vec2::new(-320.0, 280.0),
            size: Vec2::splat(45.0),
            direction: std::f32::consts::PI,
            speed: 2.0,
        };
        round.sprites.push(stray);
        assert_eq!(build(&round, false).len(), central);

        // Mouse resting in the left band of a wide canvas
        let vp = Viewport::new(1600.0, 600.0);
        let band = Vec2::new(100.0, 300.0);
        assert!(stray.contains(vp.to_field(band)));

        let input = TickInput {
            now: FRAME_DT,
            pointer: Some(vp.pointer_to_field(band)),
            ..Default::default()
        };
        tick(&mut round, &input, &mut Pcg32::seed_from_u64(9));

        assert_eq!(round.phase, Phase::Playing);
        assert_eq!(round.pointer, Some(Vec2::new(0.0, 300.0)));
    }
}

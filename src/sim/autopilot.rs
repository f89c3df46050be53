//! Idle/demo pointer controller
//!
//! Steers the pointer away from nearby capybaras, looking a few frames ahead.
//! Used by the headless runner and the in-browser demo mode.

use glam::Vec2;

use super::sprite::Sprite;
use crate::clamp_to_screen;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Pixels the pointer may travel per frame
pub const MAX_STEP: f32 = 9.0;
/// Capybaras farther than this are ignored
pub const THREAT_RADIUS: f32 = 160.0;
/// Frames of lookahead when predicting sprite positions
pub const LOOKAHEAD_FRAMES: u32 = 8;
/// Where the autopilot parks when nothing threatens it
pub const HOME: Vec2 = Vec2::new(60.0, 60.0);

/// Pointer position the autopilot starts from
pub fn start_position() -> Vec2 {
    HOME
}

/// Pick the next pointer position
pub fn steer(sprites: &[Sprite], from: Vec2) -> Vec2 {
    let mut push = Vec2::ZERO;

    for sprite in sprites {
        let predicted = sprite.position_after(LOOKAHEAD_FRAMES) + sprite.size / 2.0;
        for threat in [sprite.center(), predicted] {
            let away = from - threat;
            // Pad by half the box so large capybaras count as closer
            let dist = (away.length() - sprite.size.max_element() / 2.0).max(1.0);
            if dist > THREAT_RADIUS {
                continue;
            }
            push += away.normalize_or(Vec2::X) / (dist * dist);
        }
    }

    // Screen walls repel too, otherwise the pointer gets pinned in a corner
    let walls = [
        (from.x.max(1.0), Vec2::X),
        ((SCREEN_WIDTH - from.x).max(1.0), Vec2::NEG_X),
        (from.y.max(1.0), Vec2::Y),
        ((SCREEN_HEIGHT - from.y).max(1.0), Vec2::NEG_Y),
    ];
    let threatened = push != Vec2::ZERO;
    if threatened {
        for (dist, normal) in walls {
            if dist < THREAT_RADIUS / 4.0 {
                push += normal / (dist * dist) * 0.5;
            }
        }
    }

    let step = if threatened {
        push.normalize_or_zero() * MAX_STEP
    } else {
        // Drift home slowly
        let to_home = HOME - from;
        to_home.clamp_length_max(MAX_STEP / 3.0)
    };

    clamp_to_screen(from + step)
}

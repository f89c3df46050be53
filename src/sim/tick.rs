//! Per-frame round update
//!
//! One call advances the round by exactly one frame at the target rate:
//! input handling, then (while playing) rotation, motion, spawning and the
//! pointer hit test, in that order.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::collision::first_hit;
use super::spawn::spawn_sprite;
use super::sprite::advance_all;
use super::state::{GameEvent, Phase, RoundState};
use crate::consts::ROUND_CENTER;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Driver clock reading for this frame (seconds)
    pub now: f64,
    /// Pointer position in screen space, if known
    pub pointer: Option<Vec2>,
    /// Start a new round (honoured only after a loss)
    pub restart: bool,
    /// Leave the game (honoured only after a loss)
    pub quit: bool,
    /// Flip the music mute (honoured only while playing)
    pub toggle_mute: bool,
    /// Window/tab is closing
    pub close: bool,
    /// Idle/demo mode - the autopilot drives the pointer
    pub idle_mode: bool,
}

/// Advance the round by one frame
pub fn tick<R: Rng + ?Sized>(state: &mut RoundState, input: &TickInput, rng: &mut R) {
    if input.close {
        state.events.push(GameEvent::QuitRequested);
        return;
    }

    match state.phase {
        Phase::GameOver => {
            if input.quit {
                state.events.push(GameEvent::QuitRequested);
            } else if input.restart {
                state.reset(input.now);
                state.events.push(GameEvent::Restarted);
                log::info!("Round restarted at t={:.3}", input.now);
            }
        }
        Phase::Playing => {
            if input.toggle_mute {
                state.muted = !state.muted;
                state.events.push(GameEvent::MuteToggled { muted: state.muted });
            }

            let pointer = if input.idle_mode {
                let from = state.pointer.unwrap_or_else(autopilot::start_position);
                Some(autopilot::steer(&state.sprites, from))
            } else {
                input.pointer.or(state.pointer)
            };
            state.pointer = pointer;

            play_frame(state, input.now, rng);
        }
    }
}

fn play_frame<R: Rng + ?Sized>(state: &mut RoundState, now: f64, rng: &mut R) {
    state.elapsed = (now - state.start_time).max(0.0);
    state.frames += 1;

    let variant = state.variant;

    // Spin
    state.angle = variant
        .rotation_model()
        .advance(state.angle, state.elapsed, state.spawn_rate());

    // Move
    advance_all(&mut state.sprites);

    // Spawn
    let draw: f64 = rng.random();
    if variant.spawn_policy().should_spawn(state.elapsed, draw) {
        state.sprites.push(spawn_sprite(variant, ROUND_CENTER, rng));
        let index = state.sprites.len() - 1;
        log::debug!(
            "Capybara #{} ejected at t={:.3}s",
            index,
            state.elapsed
        );
        state.events.push(GameEvent::SpriteSpawned { index });
    }

    // Hit test
    if let Some(pointer) = state.pointer {
        if let Some(sprite) = first_hit(&state.sprites, pointer) {
            let score = state.score();
            state.phase = Phase::GameOver;
            state.final_score = Some(score);
            state.events.push(GameEvent::RoundLost { score, sprite });
            log::info!(
                "Round lost after {:.3}s ({} capybaras on field), score {}",
                state.elapsed,
                state.sprites.len(),
                score
            );
        }
    }
}

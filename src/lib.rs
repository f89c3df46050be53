//! Capybara Evasion - a single-screen reflex game
//!
//! Core modules:
//! - `sim`: Round simulation (spawning, motion, rotation, collisions, round state)
//! - `context`: Owned game context tying the round to the score log and music
//! - `score_log`: Append-only survival-time log
//! - `platform`: Frame timing shared by the browser and headless drivers
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted player/operator preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod context;
pub mod platform;
pub mod renderer;
pub mod score_log;
pub mod settings;
pub mod sim;

pub use context::{FrameOutcome, GameContext, MusicPlayer, SilentMusic};
pub use score_log::{ScoreEntry, ScoreLog, ScoreLogError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Where the central capybara sits and ejected ones start
    pub const ROUND_CENTER: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);

    /// Target frame rate; every per-frame quantity assumes this
    pub const FPS: f32 = 60.0;
    /// Fixed simulation step (one frame)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Maximum catch-up steps per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock delta a single rendered frame may feed in (seconds)
    pub const MAX_FRAME_DELTA: f64 = 0.1;

    /// Ejected capybara base edge length before scaling
    pub const SPRITE_BASE_SIZE: f32 = 45.0;
    /// Random scale range for ejected capybaras (classic variant only)
    pub const SPRITE_SCALE_MIN: f32 = 1.0;
    pub const SPRITE_SCALE_MAX: f32 = 2.0;
    /// Ejection speed range (units per frame)
    pub const SPRITE_SPEED_MIN: f32 = 2.0;
    pub const SPRITE_SPEED_MAX: f32 = 5.0;

    /// Central capybara edge length (drawn only, never collides)
    pub const CENTRAL_SIZE: f32 = 96.0;

    /// Classic spawn policy: 1 spawn/s, doubling every whole second
    pub const CLASSIC_INITIAL_RATE: f64 = 1.0;
    pub const CLASSIC_RATE_MULTIPLIER: f64 = 2.0;

    /// Continuous spawn policy: per-frame probability 0.02 * 2^t
    pub const CONTINUOUS_INITIAL_RATE: f64 = 0.02;

    /// Quadratic rotation: reaches TERMINAL_SPIN (deg/s) after SPIN_RAMP_SECS
    pub const TERMINAL_SPIN: f64 = 360.0 * 60.0;
    pub const SPIN_RAMP_SECS: f64 = 15.0;
    /// Rate-proportional rotation: degrees per frame per unit spawn rate
    pub const SPIN_PER_RATE: f64 = 100.0;

    /// Number of score log rows shown on the game over screen
    pub const HISTORY_ROWS: usize = 5;
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction vector for an angle in radians
#[inline]
pub fn direction_vector(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp a point to the visible screen
#[inline]
pub fn clamp_to_screen(p: Vec2) -> Vec2 {
    p.clamp(
        Vec2::ZERO,
        Vec2::new(consts::SCREEN_WIDTH - 1.0, consts::SCREEN_HEIGHT - 1.0),
    )
}

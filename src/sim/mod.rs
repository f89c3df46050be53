//! Round simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One call to `tick` is one frame at the target rate
//! - Randomness only through the caller's RNG
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod rotation;
pub mod spawn;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{first_hit, point_in_rect};
pub use rotation::RotationModel;
pub use spawn::{SpawnPolicy, spawn_sprite};
pub use sprite::{Sprite, advance_all};
pub use state::{GameEvent, Phase, RoundState, ScoreUnit, Variant};
pub use tick::{TickInput, tick};

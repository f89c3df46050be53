//! Round state and core simulation types
//!
//! Exactly one `RoundState` is live at a time. It owns the sprite collection,
//! which only ever grows during a round and is cleared when a new round starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rotation::RotationModel;
use super::spawn::SpawnPolicy;
use super::sprite::Sprite;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Capybaras are being ejected and the pointer must avoid them
    Playing,
    /// The pointer touched a capybara; waiting for restart or quit
    GameOver,
}

/// Unit a score is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreUnit {
    Millis,
    Seconds,
}

impl ScoreUnit {
    /// Convert elapsed seconds into a truncated score
    pub fn score(&self, elapsed: f64) -> u64 {
        let elapsed = elapsed.max(0.0);
        match self {
            ScoreUnit::Millis => (elapsed * 1000.0) as u64,
            ScoreUnit::Seconds => elapsed as u64,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ScoreUnit::Millis => "ms",
            ScoreUnit::Seconds => "s",
        }
    }
}

/// Gameplay variant
///
/// Each variant pairs a spawn policy with the rotation model and score unit
/// it was tuned with. Mixing them is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Per-second doubling spawn rate, quadratic spin-up, scaled sprites, ms scores
    #[default]
    Classic,
    /// Continuous exponential spawn chance, spin tied to spawn rate, s scores
    Continuous,
}

impl Variant {
    pub fn spawn_policy(&self) -> SpawnPolicy {
        match self {
            Variant::Classic => SpawnPolicy::PerSecond,
            Variant::Continuous => SpawnPolicy::Continuous,
        }
    }

    pub fn rotation_model(&self) -> RotationModel {
        match self {
            Variant::Classic => RotationModel::Quadratic,
            Variant::Continuous => RotationModel::RateProportional,
        }
    }

    pub fn score_unit(&self) -> ScoreUnit {
        match self {
            Variant::Classic => ScoreUnit::Millis,
            Variant::Continuous => ScoreUnit::Seconds,
        }
    }

    /// Whether ejected capybaras get a random scale
    pub fn scales_sprites(&self) -> bool {
        matches!(self, Variant::Classic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Continuous => "continuous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "1" => Some(Variant::Classic),
            "continuous" | "2" => Some(Variant::Continuous),
            _ => None,
        }
    }
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A capybara was ejected (index into `RoundState::sprites`)
    SpriteSpawned { index: usize },
    /// The pointer touched a capybara; the round is over
    RoundLost { score: u64, sprite: usize },
    /// A new round started
    Restarted,
    /// Music mute flipped
    MuteToggled { muted: bool },
    /// The player asked to leave (quit key or window close)
    QuitRequested,
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub variant: Variant,
    pub phase: Phase,
    /// Driver clock reading (seconds) when the round began
    pub start_time: f64,
    /// Seconds survived; frozen once the round is lost
    pub elapsed: f64,
    /// Central capybara display angle in degrees, always in [0, 360)
    pub angle: f64,
    /// Music muted (survives restarts)
    pub muted: bool,
    /// Ejected capybaras in spawn order
    pub sprites: Vec<Sprite>,
    /// Last sampled pointer position (screen space)
    pub pointer: Option<Vec2>,
    /// Frames simulated in this round
    pub frames: u64,
    /// Score recorded when the round was lost
    pub final_score: Option<u64>,
    /// Pending events for the driver
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RoundState {
    /// Start a round at driver time `now`
    pub fn new(variant: Variant, now: f64) -> Self {
        Self {
            variant,
            phase: Phase::Playing,
            start_time: now,
            elapsed: 0.0,
            angle: 0.0,
            muted: false,
            sprites: Vec::new(),
            pointer: None,
            frames: 0,
            final_score: None,
            events: Vec::new(),
        }
    }

    /// Begin a fresh round at `now`, keeping the mute preference and pointer
    pub fn reset(&mut self, now: f64) {
        let muted = self.muted;
        let pointer = self.pointer;
        *self = Self::new(self.variant, now);
        self.muted = muted;
        self.pointer = pointer;
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Score for the current elapsed time in the variant's unit
    pub fn score(&self) -> u64 {
        self.variant.score_unit().score(self.elapsed)
    }

    /// Current spawn rate in the units of the active policy
    pub fn spawn_rate(&self) -> f64 {
        self.variant.spawn_policy().rate(self.elapsed)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

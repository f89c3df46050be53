//! Owned game context
//!
//! Everything the running game needs lives in one `GameContext`, created at
//! start-up and handed to the frame driver: the live round, its RNG, the score
//! log and the music collaborator. `frame` runs one tick and then performs the
//! side effects the round asked for.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::score_log::{ScoreEntry, ScoreLog, ScoreLogError, ScoreStore};
use crate::sim::{GameEvent, RoundState, TickInput, Variant, tick};

/// Prompt shown under the game over title
pub const GAME_OVER_PROMPT: &str = "Press R to Play Again or Q to Quit";

/// Background music collaborator. Fire-and-forget.
pub trait MusicPlayer {
    /// Start the looping track
    fn play(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Music player that plays nothing (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct SilentMusic {
    pub playing: bool,
    pub paused: bool,
}

impl MusicPlayer for SilentMusic {
    fn play(&mut self) {
        self.playing = true;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}

/// What the driver should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Text overlays for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: String,
    pub mute_label: String,
    pub game_over: Option<GameOverPanel>,
}

/// Game over screen contents
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverPanel {
    pub title: String,
    pub prompt: String,
    /// Most recent logged rounds, oldest first
    pub history: Vec<String>,
}

pub struct GameContext<S: ScoreStore, M: MusicPlayer> {
    round: RoundState,
    rng: Pcg32,
    score_log: ScoreLog<S>,
    music: M,
    history: Vec<String>,
    last_entry: Option<ScoreEntry>,
}

impl<S: ScoreStore, M: MusicPlayer> GameContext<S, M> {
    /// Set up the game and start the first round at driver time `now`
    ///
    /// Reads the score log once up front so a missing log is created before
    /// the first round ends.
    pub fn new(
        variant: Variant,
        store: S,
        mut music: M,
        seed: u64,
        now: f64,
    ) -> Result<Self, ScoreLogError> {
        let mut score_log = ScoreLog::new(store, variant.score_unit());
        let history = score_log.history_lines()?;
        music.play();
        log::info!(
            "Capybara Evasion ready ({} variant, seed {}, {} logged rounds shown)",
            variant.as_str(),
            seed,
            history.len()
        );

        Ok(Self {
            round: RoundState::new(variant, now),
            rng: Pcg32::seed_from_u64(seed),
            score_log,
            music,
            history,
            last_entry: None,
        })
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn music(&self) -> &M {
        &self.music
    }

    pub fn music_mut(&mut self) -> &mut M {
        &mut self.music
    }

    pub fn score_log(&self) -> &ScoreLog<S> {
        &self.score_log
    }

    /// History lines as of the last loss (or start-up)
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Entry logged for the most recent loss
    pub fn last_entry(&self) -> Option<&ScoreEntry> {
        self.last_entry.as_ref()
    }

    /// Run one frame and apply its side effects
    ///
    /// Score log failures are returned to the driver, which must stop.
    pub fn frame(&mut self, input: &TickInput) -> Result<FrameOutcome, ScoreLogError> {
        tick(&mut self.round, input, &mut self.rng);

        let mut outcome = FrameOutcome::Continue;
        for event in self.round.drain_events() {
            match event {
                GameEvent::RoundLost { score, .. } => {
                    let entry = self.score_log.record(score)?;
                    self.history = self.score_log.history_lines()?;
                    self.last_entry = Some(entry);
                }
                GameEvent::MuteToggled { muted } => {
                    if muted {
                        self.music.pause();
                    } else {
                        self.music.resume();
                    }
                    log::info!("Music {}", if muted { "muted" } else { "unmuted" });
                }
                GameEvent::QuitRequested => {
                    log::info!("Quit requested");
                    outcome = FrameOutcome::Quit;
                }
                GameEvent::Restarted => {
                    self.last_entry = None;
                }
                GameEvent::SpriteSpawned { .. } => {}
            }
        }
        Ok(outcome)
    }

    /// Overlay text for the current state
    pub fn hud(&self) -> Hud {
        let unit = self.round.variant.score_unit().suffix();
        let score = self.round.final_score.unwrap_or_else(|| self.round.score());

        let game_over = self.round.is_over().then(|| GameOverPanel {
            title: format!("Game Over! Score: {score} {unit}"),
            prompt: GAME_OVER_PROMPT.to_string(),
            history: self.history.clone(),
        });

        Hud {
            score_text: format!("Score: {score} {unit}"),
            mute_label: if self.round.muted {
                "Unmute (M)".to_string()
            } else {
                "Mute (M)".to_string()
            },
            game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FRAME_DT, ROUND_CENTER};
    use crate::score_log::MemoryStore;
    use crate::sim::Phase;
    use glam::Vec2;

    fn context(seed: u64) -> GameContext<MemoryStore, SilentMusic> {
        GameContext::new(
            Variant::Classic,
            MemoryStore::default(),
            SilentMusic::default(),
            seed,
            0.0,
        )
        .unwrap()
    }

    fn input(n: u64, pointer: Vec2) -> TickInput {
        TickInput {
            now: n as f64 * FRAME_DT,
            pointer: Some(pointer),
            ..Default::default()
        }
    }

    /// Play until the pointer at the center is hit
    fn lose_round(ctx: &mut GameContext<MemoryStore, SilentMusic>, mut n: u64) -> u64 {
        while !ctx.round().is_over() {
            n += 1;
            assert_eq!(
                ctx.frame(&input(n, ROUND_CENTER)).unwrap(),
                FrameOutcome::Continue
            );
            assert!(n < 1_000_000, "round never ended");
        }
        n
    }

    #[test]
    fn test_startup_creates_log_and_plays_music() {
        let ctx = context(1);
        assert_eq!(ctx.score_log().store().text.as_deref(), Some(""));
        assert!(ctx.history().is_empty());
        assert!(ctx.music().playing);
        assert_eq!(ctx.round().phase, Phase::Playing);
    }

    #[test]
    fn test_loss_appends_score_and_refreshes_history() {
        let mut ctx = context(2);
        lose_round(&mut ctx, 0);

        let score = ctx.round().final_score.unwrap();
        assert_eq!(ctx.last_entry().map(|e| e.score), Some(score));

        let logged = ctx.score_log().store().text.clone().unwrap();
        assert_eq!(logged.lines().count(), 1);
        assert!(logged.starts_with(&format!("{score},")));

        assert_eq!(ctx.history().len(), 1);
        assert!(ctx.history()[0].starts_with(&format!("Score: {score} ms | Date: ")));

        let hud = ctx.hud();
        let panel = hud.game_over.expect("game over panel");
        assert_eq!(panel.title, format!("Game Over! Score: {score} ms"));
        assert_eq!(panel.prompt, GAME_OVER_PROMPT);
        assert_eq!(hud.score_text, format!("Score: {score} ms"));
    }

    #[test]
    fn test_history_shows_last_five_rounds() {
        let mut ctx = context(3);
        let mut n = 0;
        for _ in 0..7 {
            n = lose_round(&mut ctx, n);
            n += 1;
            let restart = TickInput {
                now: n as f64 * FRAME_DT,
                restart: true,
                ..Default::default()
            };
            ctx.frame(&restart).unwrap();
        }

        let logged = ctx.score_log().store().text.clone().unwrap();
        assert_eq!(logged.lines().count(), 7);
        assert_eq!(ctx.history().len(), 5);
        assert!(ctx.last_entry().is_none());
    }

    #[test]
    fn test_mute_pauses_and_resumes_music() {
        let mut ctx = context(4);
        let safe = Vec2::new(5.0, 5.0);
        let mute = TickInput {
            toggle_mute: true,
            ..input(1, safe)
        };

        ctx.frame(&mute).unwrap();
        assert!(ctx.music().paused);
        assert_eq!(ctx.hud().mute_label, "Unmute (M)");

        ctx.frame(&TickInput { now: 2.0 * FRAME_DT, ..mute }).unwrap();
        assert!(!ctx.music().paused);
        assert_eq!(ctx.hud().mute_label, "Mute (M)");
    }

    #[test]
    fn test_quit_and_close() {
        let mut ctx = context(5);
        let close = TickInput {
            close: true,
            ..Default::default()
        };
        assert_eq!(ctx.frame(&close).unwrap(), FrameOutcome::Quit);

        let mut ctx = context(6);
        let n = lose_round(&mut ctx, 0);
        let quit = TickInput {
            quit: true,
            ..input(n + 1, ROUND_CENTER)
        };
        assert_eq!(ctx.frame(&quit).unwrap(), FrameOutcome::Quit);
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn read(&mut self) -> Result<Option<String>, ScoreLogError> {
            Ok(Some(String::new()))
        }

        fn create_empty(&mut self) -> Result<(), ScoreLogError> {
            Ok(())
        }

        fn append_row(&mut self, _row: &str) -> Result<(), ScoreLogError> {
            Err(ScoreLogError::Storage("disk full".into()))
        }
    }

    #[test]
    fn test_log_failure_surfaces() {
        let mut ctx = GameContext::new(
            Variant::Classic,
            BrokenStore,
            SilentMusic::default(),
            7,
            0.0,
        )
        .unwrap();

        let mut n = 0;
        loop {
            n += 1;
            match ctx.frame(&input(n, ROUND_CENTER)) {
                Ok(_) => assert!(n < 1_000_000, "round never ended"),
                Err(ScoreLogError::Storage(msg)) => {
                    assert_eq!(msg, "disk full");
                    break;
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }
}

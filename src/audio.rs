//! Background music using the Web Audio API
//!
//! The track is generated procedurally: a short pentatonic phrase over a bass
//! line, scheduled a little ahead of the audio clock and repeated forever.

use web_sys::{AudioContext, GainNode, OscillatorType};

use crate::context::MusicPlayer;

/// Length of one step of the phrase (seconds)
const STEP_SECS: f64 = 0.22;
/// How far ahead of the audio clock notes are queued (seconds)
const LOOKAHEAD_SECS: f64 = 0.5;

/// Lead line, one entry per step (Hz, 0 = rest)
const MELODY: [f32; 16] = [
    392.0, 440.0, 523.25, 0.0, 587.33, 523.25, 440.0, 0.0, //
    392.0, 329.63, 392.0, 440.0, 523.25, 0.0, 440.0, 0.0,
];
/// Bass line, played on every fourth step
const BASS: [f32; 4] = [98.0, 130.81, 110.0, 146.83];

/// Looping music track
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master: Option<GainNode>,
    volume: f32,
    playing: bool,
    paused: bool,
    /// Audio clock time up to which notes are queued
    scheduled_until: f64,
    step: usize,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - music disabled");
        }

        let master = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(volume);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });

        Self {
            ctx,
            master,
            volume,
            playing: false,
            paused: false,
            scheduled_until: 0.0,
            step: 0,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Browsers keep the context suspended until a user gesture; call from
    /// input handlers.
    pub fn unlock(&self) {
        if self.paused {
            return;
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Queue notes up to the lookahead horizon; call once per frame
    pub fn update(&mut self) {
        if !self.playing || self.paused {
            return;
        }
        let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
            return;
        };

        let now = ctx.current_time();
        // Fell behind (context was suspended or the tab slept): restart the queue
        if self.scheduled_until < now {
            self.scheduled_until = now;
        }

        while self.scheduled_until < now + LOOKAHEAD_SECS {
            let t = self.scheduled_until;
            let lead = MELODY[self.step % MELODY.len()];
            if lead > 0.0 {
                play_note(ctx, master, lead, OscillatorType::Triangle, 0.25, t, STEP_SECS * 0.9);
            }
            if self.step % 4 == 0 {
                let bass = BASS[(self.step / 4) % BASS.len()];
                play_note(ctx, master, bass, OscillatorType::Sine, 0.35, t, STEP_SECS * 3.5);
            }
            self.step = (self.step + 1) % MELODY.len();
            self.scheduled_until += STEP_SECS;
        }
    }
}

impl MusicPlayer for AudioManager {
    fn play(&mut self) {
        self.playing = true;
        self.paused = false;
        self.step = 0;
        self.scheduled_until = self.ctx.as_ref().map_or(0.0, |ctx| ctx.current_time());
        self.update();
    }

    fn pause(&mut self) {
        self.paused = true;
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    fn resume(&mut self) {
        self.paused = false;
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }
}

/// One enveloped oscillator note into `master`
fn play_note(
    ctx: &AudioContext,
    master: &GainNode,
    freq: f32,
    osc_type: OscillatorType,
    level: f32,
    start: f64,
    duration: f64,
) {
    let Ok(osc) = ctx.create_oscillator() else {
        return;
    };
    let Ok(gain) = ctx.create_gain() else {
        return;
    };

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    if osc.connect_with_audio_node(&gain).is_err() || gain.connect_with_audio_node(master).is_err()
    {
        return;
    }

    gain.gain().set_value_at_time(0.001, start).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(level, start + 0.02)
        .ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.001, start + duration)
        .ok();

    osc.start_with_when(start).ok();
    osc.stop_with_when(start + duration + 0.05).ok();
}

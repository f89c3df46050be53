//! Fixed-step frame timing
//!
//! The round is tuned per frame at 60 Hz, while the display may refresh at any
//! rate. `FrameTimer` accumulates wall-clock deltas and hands out whole frames,
//! each stamped with a simulation clock reading.

use crate::consts::{FRAME_DT, MAX_FRAME_DELTA, MAX_SUBSTEPS};

#[derive(Debug, Clone)]
pub struct FrameTimer {
    accumulator: f64,
    /// Simulation clock (seconds); advances exactly one step per frame
    sim_time: f64,
    /// Last wall-clock reading fed in
    last_wall: Option<f64>,
    /// Total frames handed out
    pub frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            sim_time: 0.0,
            last_wall: None,
            frame_count: 0,
        }
    }

    /// Current simulation clock reading
    pub fn now(&self) -> f64 {
        self.sim_time
    }

    /// Feed a wall-clock reading (seconds) and get the number of frames to run
    ///
    /// The first reading only primes the timer. Long stalls are clamped so a
    /// background tab does not replay seconds of gameplay at once.
    pub fn advance_to(&mut self, wall: f64) -> u32 {
        let delta = match self.last_wall {
            Some(last) => (wall - last).clamp(0.0, MAX_FRAME_DELTA),
            None => 0.0,
        };
        self.last_wall = Some(wall);
        self.accumulate(delta)
    }

    /// Feed a wall-clock delta (seconds) and get the number of frames to run
    pub fn accumulate(&mut self, delta: f64) -> u32 {
        self.accumulator += delta.clamp(0.0, MAX_FRAME_DELTA);

        let mut steps = 0;
        while self.accumulator >= FRAME_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= FRAME_DT {
            log::warn!(
                "Dropping {:.1}ms of backlog after {} catch-up frames",
                self.accumulator * 1000.0,
                MAX_SUBSTEPS
            );
            self.accumulator = 0.0;
        }
        steps
    }

    /// Step the simulation clock by one frame and return the new reading
    pub fn step(&mut self) -> f64 {
        self.frame_count += 1;
        self.sim_time = self.frame_count as f64 * FRAME_DT;
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reading_primes_only() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.advance_to(1234.5), 0);
        // 1/60 s later exactly one frame is due (allow for rounding)
        let due = timer.advance_to(1234.5 + FRAME_DT * 1.01);
        assert_eq!(due, 1);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.accumulate(FRAME_DT * 0.6), 0);
        assert_eq!(timer.accumulate(FRAME_DT * 0.6), 1);
        assert_eq!(timer.accumulate(FRAME_DT * 2.0), 2);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut timer = FrameTimer::new();
        timer.advance_to(0.0);
        let due = timer.advance_to(30.0);
        assert!(due <= MAX_SUBSTEPS);
        assert!(due >= 5);
        // Clamped to MAX_FRAME_DELTA, nothing left over
        assert_eq!(timer.accumulate(0.0), 0);
    }

    #[test]
    fn test_step_is_exact_multiple() {
        let mut timer = FrameTimer::new();
        for _ in 0..600 {
            timer.step();
        }
        assert_eq!(timer.frame_count, 600);
        assert!((timer.now() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut timer = FrameTimer::new();
        timer.advance_to(10.0);
        assert_eq!(timer.advance_to(9.0), 0);
    }
}

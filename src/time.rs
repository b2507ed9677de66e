//! Tick clock for a single run.
//!
//! The clock hands out tick numbers until either it is stopped (the ensemble
//! resolved) or the hard tick cap is reached. It also keeps wall-clock timing
//! for logging; that timing never influences the simulation outcome.
//!
//! # Example
//!
//! ```ignore
//! use gamma_shield::time::TickClock;
//!
//! let mut clock = TickClock::new(200);
//! while let Some(tick) = clock.next_tick() {
//!     // advance, draw...
//!     if done {
//!         clock.stop();
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Counts ticks of one run against a hard cap.
#[derive(Debug)]
pub struct TickClock {
    /// When the clock was created.
    start: Instant,
    /// Ticks handed out so far.
    tick: u32,
    /// Hard upper bound on ticks.
    max_ticks: u32,
    /// Set once the run resolved.
    stopped: bool,
}

impl TickClock {
    /// Create a clock that allows at most `max_ticks` ticks.
    pub fn new(max_ticks: u32) -> Self {
        Self {
            start: Instant::now(),
            tick: 0,
            max_ticks,
            stopped: false,
        }
    }

    /// Start the next tick, returning its 1-based number.
    ///
    /// Returns `None` once stopped or capped.
    pub fn next_tick(&mut self) -> Option<u32> {
        if self.stopped || self.is_capped() {
            return None;
        }
        self.tick += 1;
        Some(self.tick)
    }

    /// Stop handing out ticks.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether the tick cap has been reached.
    #[inline]
    pub fn is_capped(&self) -> bool {
        self.tick >= self.max_ticks
    }

    /// Ticks elapsed so far.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[inline]
    pub fn max_ticks(&self) -> u32 {
        self.max_ticks
    }

    /// Wall-clock time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Average ticks per second, for logging.
    pub fn ticks_per_second(&self) -> f32 {
        let secs = self.elapsed().as_secs_f32();
        if secs > 0.0 {
            self.tick as f32 / secs
        } else {
            0.0
        }
    }
}

//! Game time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter driven by the host
//! world's update loop.  The mapping to wall-clock time lives in `GameClock`:
//!
//!   wall_time = start_unix_secs + tick / ticks_per_second
//!
//! All delays (teleport warm-up, cooldowns, settle delays) are stored in
//! ticks so scheduling arithmetic is exact.  The default rate is 20 ticks per
//! second.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute game tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── GameClock ─────────────────────────────────────────────────────────────────

/// Converts between tick counts and Unix wall-clock seconds.
#[derive(Clone, Debug)]
pub struct GameClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// Ticks per real second.  Default: 20.
    pub ticks_per_second: u32,
    /// The current tick, advanced by `GameClock::advance()` each update.
    pub current_tick: Tick,
}

impl GameClock {
    pub fn new(start_unix_secs: i64, ticks_per_second: u32) -> Self {
        Self {
            start_unix_secs,
            ticks_per_second: ticks_per_second.max(1),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Unix timestamp corresponding to `tick` (whole seconds, truncated).
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + (tick.0 / self.ticks_per_second as u64) as i64
    }

    /// Current Unix timestamp.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `secs` seconds.
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs * self.ticks_per_second as u64
    }

    /// Whole seconds covering `ticks`, rounded up; a player told "1 second"
    /// never finds the wait still running.
    #[inline]
    pub fn secs_for_ticks(&self, ticks: u64) -> u64 {
        ticks.div_ceil(self.ticks_per_second as u64)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (unix {})", self.current_tick, self.current_unix_secs())
    }
}

//! Monotonic time sources for the profile registry.
//!
//! The registry never reads the system clock directly. It asks a [`Clock`]
//! for a [`Timestamp`] at every `begin`/`end`, which keeps the platform
//! backend swappable and lets tests drive time by hand with [`ManualClock`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::ProfilerError;

/// A point in time, in nanoseconds since the owning clock's origin.
///
/// Timestamps are only comparable when taken from the same [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_nanos(nanos: u64) -> Self {
        Timestamp(nanos)
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}ns", self.0)
    }
}

/// A monotonic, never-decreasing time source.
///
/// Implementations must be cheap to call: the profiler reads the clock twice
/// per measured region, and the reads should not dominate regions in the
/// microsecond range.
pub trait Clock: Send + Sync {
    /// Current time. Successive calls never return a smaller value.
    fn now(&self) -> Timestamp;

    /// Verify the backend is usable. Called once when a registry is built.
    fn check(&self) -> Result<(), ProfilerError> {
        Ok(())
    }
}

static PROCESS_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// The host's monotonic clock.
///
/// Backed by [`std::time::Instant`], which uses the platform high-resolution
/// counter (QueryPerformanceCounter, `mach_absolute_time`, `CLOCK_MONOTONIC`).
/// All instances share one process-wide origin, so their timestamps are
/// interchangeable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Lazy::force(&PROCESS_ORIGIN);
        MonotonicClock
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Timestamp {
        let nanos = PROCESS_ORIGIN.elapsed().as_nanos();
        Timestamp(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// A clock that only moves when told to.
///
/// Useful for deterministic tests and for feeding recorded timings back
/// through a registry.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    unavailable: AtomicBool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(start.as_nanos()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let step = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(step))
            });
    }

    /// Make [`Clock::check`] fail, simulating a missing time source.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.nanos.load(Ordering::SeqCst))
    }

    fn check(&self) -> Result<(), ProfilerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProfilerError::ClockUnavailable(
                "manual clock marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

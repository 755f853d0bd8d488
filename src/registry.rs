use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::{Clock, MonotonicClock, Timestamp};
use crate::error::ProfilerError;
use crate::report::{Report, ReportRow, TimeUnit};

/// Whether the crate was built with the `enabled` feature. When it is off,
/// `begin` and `end` are no-ops and report printing writes nothing.
pub const ENABLED: bool = cfg!(feature = "enabled");

/// Number of distinct names a default registry accepts.
pub const DEFAULT_CAPACITY: usize = 65_536;

/// Upper bound on the number of distinct profile names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capacity {
    Bounded(usize),
    Unbounded,
}

impl Capacity {
    fn admits(&self, len: usize) -> bool {
        match self {
            Capacity::Bounded(max) => len < *max,
            Capacity::Unbounded => true,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity::Bounded(DEFAULT_CAPACITY)
    }
}

/// Accumulated measurements for one profile name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    name: String,
    call_count: u64,
    total_elapsed: Duration,
    #[serde(skip)]
    last_start: Option<Timestamp>,
}

impl ProfileEntry {
    fn started(name: &str, at: Timestamp) -> Self {
        Self {
            name: name.to_string(),
            call_count: 1,
            total_elapsed: Duration::ZERO,
            last_start: Some(at),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of `begin` calls recorded for this name.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Sum of every completed begin/end interval.
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Start of the interval still waiting for its `end`, if any.
    pub fn last_start(&self) -> Option<Timestamp> {
        self.last_start
    }

    pub fn is_running(&self) -> bool {
        self.last_start.is_some()
    }

    fn to_row(&self) -> ReportRow {
        ReportRow {
            name: self.name.clone(),
            call_count: self.call_count,
            total_elapsed: self.total_elapsed,
        }
    }
}

/// Table of named profile entries, kept in first-seen order.
///
/// Mutating operations take `&mut self`, so a registry cannot be shared
/// between threads without external synchronization. Use
/// [`SharedRegistry`](crate::SharedRegistry) when several threads need to
/// record into the same table.
///
/// A region's time includes everything that runs inside it, nested profiled
/// regions included. Starting a name again before its `end` replaces the
/// pending start, so the same name cannot be used recursively.
pub struct ProfileRegistry {
    entries: Vec<ProfileEntry>,
    index: HashMap<String, usize>,
    capacity: Capacity,
    unit: TimeUnit,
    clock: Arc<dyn Clock>,
}

impl ProfileRegistry {
    /// A registry on the host monotonic clock with the default capacity.
    pub fn new() -> Self {
        Self::from_parts(
            Capacity::default(),
            TimeUnit::default(),
            Arc::new(MonotonicClock::new()),
        )
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn from_parts(capacity: Capacity, unit: TimeUnit, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            capacity,
            unit,
            clock,
        }
    }

    /// Start timing `name`.
    ///
    /// The first `begin` for a name appends a new entry. Later calls bump the
    /// call count and restart the pending interval. Fails only when a new name
    /// would exceed the registry's capacity, in which case nothing changes.
    ///
    /// Without the `enabled` feature this does nothing.
    pub fn begin(&mut self, name: &str) -> Result<(), ProfilerError> {
        if !ENABLED {
            return Ok(());
        }
        let now = self.clock.now();

        if let Some(&idx) = self.index.get(name) {
            let entry = &mut self.entries[idx];
            if entry.last_start.is_some() {
                debug!(
                    event = "Begin",
                    phase = "Restart",
                    name = name,
                    "pending start discarded"
                );
            }
            entry.last_start = Some(now);
            entry.call_count = entry.call_count.saturating_add(1);
            return Ok(());
        }

        if !self.capacity.admits(self.entries.len()) {
            let capacity = match self.capacity {
                Capacity::Bounded(max) => max,
                Capacity::Unbounded => self.entries.len(),
            };
            warn!(
                event = "Begin",
                phase = "Capacity",
                name = name,
                capacity = capacity
            );
            return Err(ProfilerError::CapacityExceeded {
                capacity,
                name: name.to_string(),
            });
        }

        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(ProfileEntry::started(name, now));
        debug!(event = "Begin", phase = "NewEntry", name = name);
        Ok(())
    }

    /// Stop timing `name` and add the interval to its total.
    ///
    /// Returns the measured interval, or `None` when there is no pending
    /// `begin` for the name. An unmatched `end` never creates an entry.
    pub fn end(&mut self, name: &str) -> Option<Duration> {
        if !ENABLED {
            return None;
        }
        let now = self.clock.now();

        let Some(&idx) = self.index.get(name) else {
            debug!(event = "End", phase = "Unknown", name = name);
            return None;
        };
        let entry = &mut self.entries[idx];
        let Some(start) = entry.last_start.take() else {
            debug!(event = "End", phase = "Unmatched", name = name);
            return None;
        };

        let elapsed = now.saturating_duration_since(start);
        entry.total_elapsed = entry.total_elapsed.saturating_add(elapsed);
        Some(elapsed)
    }

    /// Snapshot every entry, in first-seen order.
    pub fn report(&self) -> Report {
        Report::new(self.unit, self.entries.iter().map(ProfileEntry::to_row).collect())
    }

    /// Write the report table to `out`. Writes nothing without `enabled`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<(), ProfilerError> {
        if !ENABLED {
            return Ok(());
        }
        self.report().write_to(out)
    }

    /// Write the report table to standard output. Writes nothing without
    /// `enabled`.
    pub fn print_report(&self) -> Result<(), ProfilerError> {
        if !ENABLED {
            return Ok(());
        }
        self.report().print()
    }

    pub fn get(&self, name: &str) -> Option<&ProfileEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProfileEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.get(name).is_some_and(ProfileEntry::is_running)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: TimeUnit) {
        self.unit = unit;
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Combined time of all entries. Overlapping regions are counted twice.
    pub fn total_elapsed(&self) -> Duration {
        self.entries
            .iter()
            .fold(Duration::ZERO, |acc, e| acc.saturating_add(e.total_elapsed))
    }

    /// Zero every counter but keep the names and their order.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.call_count = 0;
            entry.total_elapsed = Duration::ZERO;
            entry.last_start = None;
        }
        debug!(event = "Reset", entries = self.entries.len());
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        debug!(event = "Clear");
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ProfileRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProfileRegistry")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

/// Configures a [`ProfileRegistry`].
///
/// ```rust,ignore
/// use region_profiler::{ProfileRegistry, TimeUnit};
///
/// let mut registry = ProfileRegistry::builder()
///     .capacity(128)
///     .unit(TimeUnit::Milliseconds)
///     .build()?;
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    capacity: Capacity,
    unit: TimeUnit,
    clock: Option<Arc<dyn Clock>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the registry to `max` distinct names.
    pub fn capacity(mut self, max: usize) -> Self {
        self.capacity = Capacity::Bounded(max);
        self
    }

    /// Accept any number of distinct names.
    pub fn unbounded(mut self) -> Self {
        self.capacity = Capacity::Unbounded;
        self
    }

    /// Unit used when rendering reports.
    pub fn unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Time source; defaults to [`MonotonicClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the registry. Fails if the clock reports itself unusable.
    pub fn build(self) -> Result<ProfileRegistry, ProfilerError> {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()) as Arc<dyn Clock>);
        clock.check()?;
        debug!(
            event = "Build",
            capacity = ?self.capacity,
            unit = %self.unit
        );
        Ok(ProfileRegistry::from_parts(self.capacity, self.unit, clock))
    }
}

//! In-process profiler for named code regions.
//!
//! A [`ProfileRegistry`] keeps one entry per region name with its call count
//! and cumulative wall-clock time. Regions are bracketed with
//! [`ProfileRegistry::begin`] and [`ProfileRegistry::end`], or scoped with
//! [`ProfileRegistry::region`], and results are printed as a fixed-column
//! table by [`ProfileRegistry::report`].
//!
//! ```rust,ignore
//! use region_profiler::ProfileRegistry;
//!
//! let mut registry = ProfileRegistry::new();
//! registry.begin("parse")?;
//! // ... work ...
//! registry.end("parse");
//! registry.print_report()?;
//! ```
//!
//! Profiling is compiled in by the default `enabled` feature. Building with
//! `default-features = false` turns `begin`, `end`, report printing and
//! [`profile!`] into no-ops while keeping every call site compiling.
//!
//! The registry is not synchronized; see [`SharedRegistry`] for a variant
//! that can be recorded into from several threads.

#[macro_use]
mod macros;

mod clock;
mod error;
mod guard;
mod registry;
mod report;
mod shared;

pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use error::ProfilerError;
pub use guard::RegionGuard;
pub use registry::{
    Capacity, DEFAULT_CAPACITY, ENABLED, ProfileEntry, ProfileRegistry, RegistryBuilder,
};
pub use report::{Report, ReportRow, TimeUnit};
pub use shared::{SharedRegionGuard, SharedRegistry};

#[doc(hidden)]
pub use tracing as __tracing;

#[cfg(test)]
mod tests;

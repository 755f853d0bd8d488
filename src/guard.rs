//! Scoped region timing.
//!
//! [`RegionGuard`] calls `begin` when it is created and `end` when it is
//! dropped, so the region is closed on every exit path: normal return,
//! early return through `?`, or an unwinding panic.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::error::ProfilerError;
use crate::registry::ProfileRegistry;

/// RAII handle for an open profile region.
///
/// The guard borrows the registry mutably and dereferences to it, so nested
/// regions are opened through the outer guard:
///
/// ```rust,ignore
/// let mut registry = ProfileRegistry::new();
/// {
///     let mut outer = registry.region("load")?;
///     let _inner = outer.region("parse")?;
///     // ... work being measured ...
/// } // both regions end here, innermost first
/// ```
pub struct RegionGuard<'a> {
    registry: &'a mut ProfileRegistry,
    name: String,
    open: bool,
}

impl<'a> RegionGuard<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// End the region now and return the measured interval.
    pub fn finish(mut self) -> Option<Duration> {
        self.open = false;
        self.registry.end(&self.name)
    }
}

impl Deref for RegionGuard<'_> {
    type Target = ProfileRegistry;

    fn deref(&self) -> &Self::Target {
        self.registry
    }
}

impl DerefMut for RegionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
    }
}

impl Drop for RegionGuard<'_> {
    fn drop(&mut self) {
        if self.open {
            self.registry.end(&self.name);
        }
    }
}

impl ProfileRegistry {
    /// Begin `name` and return a guard that ends it when dropped.
    pub fn region(&mut self, name: impl Into<String>) -> Result<RegionGuard<'_>, ProfilerError> {
        let name = name.into();
        self.begin(&name)?;
        Ok(self.adopt_region(name))
    }

    /// Guard a region whose `begin` has already been issued.
    #[doc(hidden)]
    pub fn adopt_region(&mut self, name: impl Into<String>) -> RegionGuard<'_> {
        RegionGuard {
            registry: self,
            name: name.into(),
            open: true,
        }
    }

    /// Run `work` inside a region named `name` and return its result.
    ///
    /// The closure receives the registry so it can open nested regions.
    pub fn measure<T>(
        &mut self,
        name: &str,
        work: impl FnOnce(&mut ProfileRegistry) -> T,
    ) -> Result<T, ProfilerError> {
        let mut guard = self.region(name)?;
        Ok(work(&mut *guard))
    }
}

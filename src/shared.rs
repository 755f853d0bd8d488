use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::warn;

use crate::error::ProfilerError;
use crate::registry::ProfileRegistry;
use crate::report::Report;

/// A [`ProfileRegistry`] behind a single lock. Cloneable and thread-safe.
///
/// Every operation takes the lock for its whole duration, so entries stay
/// consistent when several threads record at once. Threads that share a
/// profile name still share its pending start: a `begin` on one thread
/// replaces the start recorded by another. Give each thread its own names
/// when per-thread timings matter.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ProfileRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, name: &str) -> Result<(), ProfilerError> {
        self.inner.lock()?.begin(name)
    }

    pub fn end(&self, name: &str) -> Result<Option<Duration>, ProfilerError> {
        Ok(self.inner.lock()?.end(name))
    }

    pub fn report(&self) -> Result<Report, ProfilerError> {
        Ok(self.inner.lock()?.report())
    }

    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<(), ProfilerError> {
        self.report()?.write_to(out)
    }

    pub fn print_report(&self) -> Result<(), ProfilerError> {
        self.report()?.print()
    }

    /// Run `f` with exclusive access to the underlying registry.
    pub fn with<T>(&self, f: impl FnOnce(&mut ProfileRegistry) -> T) -> Result<T, ProfilerError> {
        let mut guard = self.inner.lock()?;
        Ok(f(&mut *guard))
    }

    /// Begin `name` and return an owned guard that ends it when dropped.
    ///
    /// The lock is not held while the guard is alive.
    pub fn region(&self, name: impl Into<String>) -> Result<SharedRegionGuard, ProfilerError> {
        let name = name.into();
        self.begin(&name)?;
        Ok(SharedRegionGuard {
            registry: self.clone(),
            name,
        })
    }
}

impl From<ProfileRegistry> for SharedRegistry {
    fn from(registry: ProfileRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

/// Owned region guard for a [`SharedRegistry`]; may be sent across threads.
pub struct SharedRegionGuard {
    registry: SharedRegistry,
    name: String,
}

impl SharedRegionGuard {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for SharedRegionGuard {
    fn drop(&mut self) {
        if let Err(err) = self.registry.end(&self.name) {
            warn!(
                event = "End",
                phase = "Guard",
                name = self.name.as_str(),
                error = %err
            );
        }
    }
}

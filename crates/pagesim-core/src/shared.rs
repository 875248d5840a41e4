use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::job::{Job, JobId, JobRegistry};
use crate::memory::MemorySnapshot;
use crate::translate::{AddressTranslator, Translation};

/// A [`JobRegistry`] shared between threads.
///
/// Job creation and removal take the exclusive write lock, translations and
/// snapshots take the shared read lock. A snapshot therefore never observes a
/// job while it is being created or removed. Clones refer to the same registry.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<JobRegistry>>,
}

impl SharedRegistry {
    /// Wraps `registry` for shared use.
    pub fn new(registry: JobRegistry) -> Self {
        SharedRegistry {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, JobRegistry>> {
        self.inner.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, JobRegistry>> {
        self.inner.write().map_err(|_| Error::LockPoisoned)
    }

    /// See [`JobRegistry::create_job`].
    pub fn create_job(&self, name: impl Into<String>, requested_size: i64) -> Result<JobId> {
        self.write()?.create_job(name, requested_size)
    }

    /// See [`JobRegistry::remove_job`].
    pub fn remove_job(&self, id: JobId) -> Result<Job> {
        self.write()?.remove_job(id)
    }

    /// Returns a copy of a live job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownJobId`] if no live job has this id.
    pub fn lookup(&self, id: JobId) -> Result<Job> {
        self.read()?.lookup(id).cloned()
    }

    /// Captures a consistent [`MemorySnapshot`].
    pub fn snapshot(&self) -> Result<MemorySnapshot> {
        Ok(MemorySnapshot::capture(&*self.read()?))
    }
}

impl AddressTranslator for SharedRegistry {
    fn translate(&self, job: JobId, logical_address: i64) -> Result<Translation> {
        self.read()?.translate(job, logical_address)
    }
}

impl From<JobRegistry> for SharedRegistry {
    fn from(registry: JobRegistry) -> Self {
        SharedRegistry::new(registry)
    }
}

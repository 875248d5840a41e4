use std::collections::BTreeMap;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::allocator::{FrameAllocator, FrameSelector};
use crate::config::PagerConfig;
use crate::error::{Error, Result};
use crate::memory::PageTable;
use crate::selector;

/// Identifier of a job, unique within one [`JobRegistry`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Returns the id as a u64.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        JobId(id)
    }
}

/// A job whose pages are mapped onto frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Job {
    id: JobId,
    name: String,
    requested_size: usize,
    internal_fragmentation: usize,
    page_table: PageTable,
}

impl Job {
    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Label given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested size in bytes. Valid logical addresses are `0..requested_size`.
    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    /// Number of pages, `ceil(requested_size / page_size)`.
    pub fn page_count(&self) -> usize {
        self.page_table.len()
    }

    /// Unused bytes in the last page.
    pub fn internal_fragmentation(&self) -> usize {
        self.internal_fragmentation
    }

    /// Mapping from logical page to frame.
    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }
}

/// Owner of all jobs and of the frame pool backing them.
///
/// The registry keeps job records and frame ownership in lockstep: a job is
/// either fully mapped and registered, or absent with none of its frames owned.
/// Job ids start at 1 and are never reused within one registry.
#[derive(Debug)]
pub struct JobRegistry {
    config: PagerConfig,
    allocator: FrameAllocator,
    jobs: BTreeMap<JobId, Job>,
    next_id: u64,
}

impl JobRegistry {
    /// Creates an empty registry using the frame selection policy of `config`.
    pub fn new(config: PagerConfig) -> Self {
        let selector = selector::from_config(&config);
        Self::with_selector(config, selector)
    }

    /// Creates an empty registry with a custom frame selector.
    ///
    /// The policy and seed stored in `config` are ignored.
    pub fn with_selector(config: PagerConfig, selector: Box<dyn FrameSelector>) -> Self {
        info!(
            "Paged memory of {} frames x {} bytes ({} bytes)",
            config.total_frames(),
            config.page_size(),
            config.memory_size()
        );
        JobRegistry {
            allocator: FrameAllocator::new(config.total_frames(), selector),
            config,
            jobs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Accepts a new job and maps each of its pages onto a free frame.
    ///
    /// # Arguments
    ///
    /// * `name` - Label of the job, need not be unique
    /// * `requested_size` - Size of the job in bytes
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidJobSize`] if `requested_size <= 0`
    /// * [`Error::InsufficientFrames`] if fewer free frames than pages are left
    ///
    /// On error, neither the frame pool nor the registry is modified and no id
    /// is consumed.
    pub fn create_job(&mut self, name: impl Into<String>, requested_size: i64) -> Result<JobId> {
        if requested_size <= 0 {
            return Err(Error::InvalidJobSize(requested_size));
        }
        let requested_size = requested_size as usize;
        let page_size = self.config.page_size();
        let page_count = requested_size.div_ceil(page_size);
        let internal_fragmentation = page_count * page_size - requested_size;

        let id = JobId(self.next_id);
        let frames = self.allocator.reserve(id, page_count)?;
        self.next_id += 1;

        let job = Job {
            id,
            name: name.into(),
            requested_size,
            internal_fragmentation,
            page_table: PageTable::from_frames(frames),
        };
        info!(
            "Job {} ({}) allocated: {} bytes in {} pages, {} bytes internal fragmentation",
            id, job.name, requested_size, page_count, internal_fragmentation
        );
        job.page_table.log_runs(log::Level::Debug);
        self.jobs.insert(id, job);
        Ok(id)
    }

    /// Removes a job and returns its frames to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownJobId`] if no live job has this id.
    pub fn remove_job(&mut self, id: JobId) -> Result<Job> {
        let job = self.jobs.remove(&id).ok_or(Error::UnknownJobId(id))?;
        self.allocator.release(job.page_table.frames());
        info!("Job {} ({}) removed, {} frames freed", id, job.name, job.page_count());
        Ok(job)
    }

    /// Looks up a live job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownJobId`] if no live job has this id.
    pub fn lookup(&self, id: JobId) -> Result<&Job> {
        self.jobs.get(&id).ok_or(Error::UnknownJobId(id))
    }

    /// Iterates over live jobs in id order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Number of live jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Configuration the registry was built with.
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Read-only access to the frame pool.
    pub fn allocator(&self) -> &FrameAllocator {
        &self.allocator
    }
}

use crate::job::JobId;
use thiserror::Error;

/// Errors returned by simulator operations.
///
/// Every mutating operation is all-or-nothing: when one of these is returned,
/// neither the frame pool nor the job registry has changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Page size or frame count is not positive, or the pool cannot be represented.
    #[error(
        "Invalid configuration: page size {page_size} and frame count {total_frames} must both be positive, \
         with at most {max_frames} frames and a memory size that fits in an address",
        max_frames = crate::config::MAX_TOTAL_FRAMES
    )]
    InvalidConfiguration {
        /// Requested page size in bytes
        page_size: i64,
        /// Requested number of frames
        total_frames: i64,
    },
    /// Requested job size is not positive.
    #[error("Invalid job size: {0}")]
    InvalidJobSize(i64),
    /// Not enough free frames to back every page of a job.
    #[error("Not enough free frames. Need {requested} frames, but only {available} are available.")]
    InsufficientFrames {
        /// Frames needed by the job
        requested: usize,
        /// Frames free at the time of the request
        available: usize,
    },
    /// No live job carries this id.
    #[error("Job ID {0} not found.")]
    UnknownJobId(JobId),
    /// Logical address lies outside `[0, size)` of the job.
    #[error("Logical address {address} is out of bounds for job {job} (size: {size})")]
    AddressOutOfBounds {
        /// Job the address was resolved against
        job: JobId,
        /// Offending logical address
        address: i64,
        /// Requested size of the job in bytes
        size: usize,
    },
    /// A thread panicked while holding the registry lock.
    #[error("Registry lock poisoned")]
    LockPoisoned,
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, Error>;

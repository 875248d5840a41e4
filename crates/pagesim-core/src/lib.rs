//! # pagesim core
//!
//! `pagesim-core` implements a paged physical-memory simulator. A fixed pool of
//! frames is carved out of a configured memory size, jobs of arbitrary size are
//! split into pages and mapped onto frames through per-job page tables, and
//! logical addresses are translated into physical addresses via those tables.
//!
//! ## Architecture Overview
//!
//! - [`allocator::FrameAllocator`] - Owns the frame pool and performs atomic
//!   multi-frame reservations. Which free frames are handed out is decided by a
//!   [`allocator::FrameSelector`] strategy (see [`selector`]).
//!
//! - [`JobRegistry`] - Issues job ids, builds page tables and keeps the frame pool
//!   and the job records in lockstep.
//!
//! - [`translate::AddressTranslator`] - Resolves a job's logical address into a
//!   frame, offset and physical address.
//!
//! - [`memory::MemorySnapshot`] - Read-only view of frame occupancy, page tables
//!   and jobs, renderable as text or JSON.
//!
//! - [`SharedRegistry`] - A registry behind a reader/writer lock for callers that
//!   share one simulator between threads.
//!
//! ## Example
//!
//! ```
//! use pagesim_core::{JobRegistry, PagerConfig};
//! use pagesim_core::translate::AddressTranslator;
//!
//! let config = PagerConfig::new(1024, 4)?.with_seed(7);
//! let mut registry = JobRegistry::new(config);
//! let job = registry.create_job("TestJob", 2500)?;
//! assert_eq!(registry.lookup(job)?.page_count(), 3);
//!
//! let translation = registry.translate(job, 2499)?;
//! assert_eq!(translation.page, 2);
//! assert_eq!(translation.offset, 451);
//! # Ok::<(), pagesim_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod allocator;
pub mod config;
mod error;
mod job;
pub mod memory;
pub mod selector;
mod shared;
pub mod translate;
pub mod util;

pub use crate::config::{PagerConfig, SelectionPolicy};
pub use crate::error::{Error, Result};
pub use crate::job::{Job, JobId, JobRegistry};
pub use crate::shared::SharedRegistry;

//! Physical memory abstractions of the simulator.
//!
//! - `FrameIndex`: index of a frame in the pool.
//! - `FrameState`: whether a frame is free or owned by a job page.
//! - `PhysAddr`: byte address in the simulated physical memory.
//! - `PageTable`: per-job mapping from logical page to frame.
//! - `MemorySnapshot`: read-only projection of the frame pool and the jobs.
//!
//! Helper traits:
//! - `FormatFrameRuns`: human-readable rendering of consecutive frame runs.
mod frame;
mod page_table;
mod phys_addr;
mod view;

pub use self::frame::{FrameIndex, FrameOwner, FrameState};
pub use self::page_table::{FormatFrameRuns, FrameRuns, PageTable};
pub use self::phys_addr::PhysAddr;
pub use self::view::{FrameDescriptor, JobSummary, MemorySnapshot};

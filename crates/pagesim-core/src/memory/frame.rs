use crate::job::JobId;
use serde::Serialize;
use std::fmt;

/// Index of a frame in `[0, total_frames)`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameIndex(usize);

impl FrameIndex {
    /// Creates a new frame index.
    pub const fn new(index: usize) -> Self {
        FrameIndex(index)
    }

    /// Returns the index as a usize.
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// The frame directly following this one.
    pub const fn next(&self) -> Self {
        FrameIndex(self.0 + 1)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<usize> for FrameIndex {
    fn from(index: usize) -> Self {
        FrameIndex(index)
    }
}

impl From<FrameIndex> for usize {
    fn from(index: FrameIndex) -> usize {
        index.0
    }
}

/// The job page backing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FrameOwner {
    /// Owning job
    pub job: JobId,
    /// Logical page of the job held in the frame
    pub page: usize,
}

/// Occupancy of a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum FrameState {
    /// Available for allocation
    #[default]
    Free,
    /// Exclusively held by one job page
    Owned(FrameOwner),
}

impl FrameState {
    /// Returns `true` if no job owns the frame.
    pub fn is_free(&self) -> bool {
        matches!(self, FrameState::Free)
    }

    /// Returns the owner of the frame, if any.
    pub fn owner(&self) -> Option<FrameOwner> {
        match self {
            FrameState::Free => None,
            FrameState::Owned(owner) => Some(*owner),
        }
    }
}

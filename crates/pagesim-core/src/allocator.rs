//! Frame pool management.
//!
//! This module defines the [`FrameSelector`] trait, which decides which free frames
//! back a new job, and the [`FrameAllocator`], which owns the frame pool and applies
//! reservations and releases atomically.

use crate::error::{Error, Result};
use crate::job::JobId;
use crate::memory::{FrameIndex, FrameOwner, FrameState};
use log::{debug, trace, warn};

/// Trait for strategies that pick frames out of the free set.
///
/// Implementors decide the physical layout of a job. The
/// [`Scatter`](crate::selector::Scatter) strategy picks frames at random so that
/// page tables are scattered across the pool, while
/// [`LowestFirst`](crate::selector::LowestFirst) packs jobs at the low end.
///
/// # Required Methods
///
/// Implementors must provide:
/// * [`name()`](FrameSelector::name) - A short identifier used in logs
/// * [`select()`](FrameSelector::select) - Picks frames from the free set
pub trait FrameSelector: std::fmt::Debug + Send + Sync {
    /// Short identifier of the strategy.
    fn name(&self) -> &'static str;

    /// Picks `count` distinct frames out of `free`.
    ///
    /// # Arguments
    ///
    /// * `free` - All currently free frames in ascending order
    /// * `count` - Number of frames to pick. The caller guarantees `count <= free.len()`.
    ///
    /// # Returns
    ///
    /// The chosen frames. Position `i` of the result backs logical page `i`.
    fn select(&mut self, free: &[FrameIndex], count: usize) -> Vec<FrameIndex>;
}

/// Owner of the fixed frame pool.
///
/// Every frame is either free or owned by exactly one job page. The number of
/// free frames is tracked alongside the frame states so that admission checks
/// do not need to scan the pool.
#[derive(Debug)]
pub struct FrameAllocator {
    frames: Vec<FrameState>,
    free: usize,
    selector: Box<dyn FrameSelector>,
}

impl FrameAllocator {
    /// Creates a pool of `total_frames` free frames.
    pub fn new(total_frames: usize, selector: Box<dyn FrameSelector>) -> Self {
        FrameAllocator {
            frames: vec![FrameState::Free; total_frames],
            free: total_frames,
            selector,
        }
    }

    /// Reserves `count` frames for `job`.
    ///
    /// The frames are chosen by the configured [`FrameSelector`]. Frame `i` of the
    /// returned sequence is marked as owned by logical page `i` of `job`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientFrames`] if fewer than `count` frames are free.
    /// In that case no frame changes state.
    pub fn reserve(&mut self, job: JobId, count: usize) -> Result<Vec<FrameIndex>> {
        if count > self.free {
            debug!(
                "Rejecting reservation of {} frames for job {}, {} free",
                count, job, self.free
            );
            return Err(Error::InsufficientFrames {
                requested: count,
                available: self.free,
            });
        }
        if count == 0 {
            return Ok(vec![]);
        }
        let free = self.free_frames().collect::<Vec<_>>();
        let chosen = self.selector.select(&free, count);
        assert_eq!(
            chosen.len(),
            count,
            "Selector {} returned {} frames, expected {}",
            self.selector.name(),
            chosen.len(),
            count
        );
        // validate everything before the first state change
        let mut seen = vec![false; self.frames.len()];
        for frame in &chosen {
            let idx = frame.as_usize();
            assert!(
                idx < self.frames.len() && self.frames[idx].is_free() && !seen[idx],
                "Selector {} picked frame {} which is not available",
                self.selector.name(),
                frame
            );
            seen[idx] = true;
        }
        for (page, frame) in chosen.iter().enumerate() {
            trace!("Frame {} -> job {} page {}", frame, job, page);
            self.frames[frame.as_usize()] = FrameState::Owned(FrameOwner { job, page });
        }
        self.free -= count;
        debug!(
            "Reserved {} frames for job {} using {}, {} free",
            count,
            job,
            self.selector.name(),
            self.free
        );
        Ok(chosen)
    }

    /// Returns frames to the free pool.
    ///
    /// Releasing a frame that is already free is a no-op. Indices outside the
    /// pool are ignored.
    pub fn release(&mut self, frames: &[FrameIndex]) {
        for frame in frames {
            match self.frames.get_mut(frame.as_usize()) {
                Some(state) if !state.is_free() => {
                    *state = FrameState::Free;
                    self.free += 1;
                }
                Some(_) => trace!("Frame {} already free", frame),
                None => warn!(
                    "Ignoring release of frame {} outside of pool of {} frames",
                    frame,
                    self.frames.len()
                ),
            }
        }
        debug!("Released {} frames, {} free", frames.len(), self.free);
    }

    /// Number of free frames.
    pub fn free_count(&self) -> usize {
        self.free
    }

    /// Number of frames in the pool.
    pub fn total_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of owned frames.
    pub fn used_count(&self) -> usize {
        self.frames.len() - self.free
    }

    /// State of a single frame, `None` if the index is outside the pool.
    pub fn state(&self, frame: FrameIndex) -> Option<FrameState> {
        self.frames.get(frame.as_usize()).copied()
    }

    /// States of all frames, indexed by frame.
    pub fn frames(&self) -> &[FrameState] {
        &self.frames
    }

    /// Iterates over all free frames in ascending order.
    pub fn free_frames(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_free())
            .map(|(idx, _)| FrameIndex::new(idx))
    }

    /// Name of the frame selection strategy.
    pub fn selector_name(&self) -> &'static str {
        self.selector.name()
    }
}

use crate::allocator::FrameSelector;
use crate::memory::FrameIndex;

/// Selector that always picks the lowest free frames.
///
/// Produces contiguous layouts on an unfragmented pool. Useful to compare
/// against [`Scatter`](crate::selector::Scatter) and for predictable tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestFirst;

impl FrameSelector for LowestFirst {
    fn name(&self) -> &'static str {
        "lowest-first"
    }

    fn select(&mut self, free: &[FrameIndex], count: usize) -> Vec<FrameIndex> {
        free.iter().take(count).copied().collect()
    }
}

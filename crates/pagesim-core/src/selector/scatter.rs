use crate::allocator::FrameSelector;
use crate::memory::FrameIndex;
use crate::util::Rng;
use rand::prelude::SliceRandom;

/// Selector that picks free frames at random.
///
/// Shuffles the free set and takes a prefix, so consecutive logical pages
/// usually land on unrelated frames. The generator is seedable to make page
/// tables reproducible.
#[derive(Debug, Clone)]
pub struct Scatter {
    rng: Rng,
}

impl Scatter {
    /// Creates a selector with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Scatter {
            rng: Rng::from_seed(seed),
        }
    }

    /// Creates a selector with a random seed.
    pub fn from_random_seed() -> Self {
        Scatter {
            rng: Rng::from_random_seed(),
        }
    }

    /// Seed of the underlying generator.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl FrameSelector for Scatter {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn select(&mut self, free: &[FrameIndex], count: usize) -> Vec<FrameIndex> {
        let mut candidates = free.to_vec();
        candidates.shuffle(&mut self.rng);
        candidates.truncate(count);
        candidates
    }
}

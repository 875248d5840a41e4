//! Frame selection strategies.
//!
//! Implementations of [`FrameSelector`](crate::allocator::FrameSelector):
//! - [`Scatter`] - Randomized selection from a seedable PRNG (default)
//! - [`LowestFirst`] - Deterministic lowest-index-first selection

mod lowest_first;
mod scatter;

pub use self::lowest_first::LowestFirst;
pub use self::scatter::Scatter;

use crate::allocator::FrameSelector;
use crate::config::{PagerConfig, SelectionPolicy};
use log::info;

/// Builds the selector described by `config`.
///
/// Without a fixed seed, [`Scatter`] draws one at random. The seed is logged so
/// that a run can be replayed with the same physical layout.
pub fn from_config(config: &PagerConfig) -> Box<dyn FrameSelector> {
    match config.policy() {
        SelectionPolicy::Scatter => {
            let scatter = match config.seed() {
                Some(seed) => Scatter::from_seed(seed),
                None => Scatter::from_random_seed(),
            };
            info!("Scattering frames with seed {}", scatter.seed());
            Box::new(scatter)
        }
        SelectionPolicy::LowestFirst => Box::new(LowestFirst),
    }
}

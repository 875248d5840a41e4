//! Utility types shared by the simulator.
//!
//! - [`Rng`] - Seedable random number generator that remembers its seed

mod rng;

pub use self::rng::Rng;

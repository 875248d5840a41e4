//! # pagesim
//!
//! A paged memory allocation simulator. Fixed-size frames are carved out of a
//! configured memory pool, jobs are split into pages and mapped onto frames
//! through per-job page tables, and logical addresses are translated into
//! physical ones via those tables.
//!
//! This crate re-exports [`pagesim_core`]. The interactive shell lives in the
//! `pagesim-bin` package (`cargo run --bin pagesim`).
//!
//! ## Modules
//!
//! - `allocator`: frame pool and the `FrameSelector` strategy trait.
//! - `selector`: randomized and lowest-first frame selection.
//! - `memory`: frames, page tables, physical addresses and snapshots.
//! - `translate`: logical to physical address translation.
//! - `config`: simulator configuration and config file loading.
pub use pagesim_core::*;

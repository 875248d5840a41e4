//! # pagesim shell
//!
//! Interactive front end of the paged memory simulator. The shell reads menu
//! choices and arguments from a line-oriented input, issues exactly one core
//! operation per choice, and renders the result as text.
//!
//! ## Modules
//!
//! - `shell`: menu loop, prompts and rendering of core results.
//!
//! ## External Crates
//!
//! - `log`/`env_logger`: diagnostics on stderr, so stdout carries only the
//!   rendered protocol.
pub mod shell;

/// Initializes `env_logger`, defaulting to the `warn` level.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()?;
    Ok(())
}

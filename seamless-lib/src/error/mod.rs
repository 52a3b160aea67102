//! Error types

mod config;
mod fetch;

pub use config::*;
pub use fetch::*;

/// Any error surfaced outside the engine's swallow-and-degrade boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

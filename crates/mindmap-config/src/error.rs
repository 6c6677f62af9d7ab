//! Configuration error types.

use std::path::PathBuf;

use mindmap_lod::LodConfigError;

/// Errors from loading, saving or validating `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid RON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot encode config: {0}")]
    Encode(#[from] ron::Error),

    /// The optimizer section parsed but its values are inconsistent.
    #[error("{} has invalid optimizer settings: {source}", path.display())]
    InvalidOptimizer {
        path: PathBuf,
        #[source]
        source: LodConfigError,
    },
}

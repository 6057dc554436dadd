//! Error types for the update flow

use plugman_config::ConfigError;
use plugman_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a manifest update
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load build config {}: {source}", path.display())]
    BuildConfig {
        path: PathBuf,
        source: ManifestError,
    },

    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: ManifestError,
    },

    #[error("Failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        source: ManifestError,
    },

    #[error("Failed to write pipeline output {}: {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
}

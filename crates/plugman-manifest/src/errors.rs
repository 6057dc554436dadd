use std::io;
use thiserror::Error;

/// Errors that can occur during manifest and build config operations
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse build config: {0}")]
    BuildConfig(#[from] serde_yaml::Error),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid build config: {0}")]
    InvalidBuildConfig(String),
}

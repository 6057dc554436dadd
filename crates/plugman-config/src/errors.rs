use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with the release inputs
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required input: {var}")]
    Missing { var: &'static str },

    #[error("Checksum file not found: {}", .0.display())]
    ChecksumNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

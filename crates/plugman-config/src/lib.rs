//! Release input configuration
//!
//! Every value the updater needs from its host pipeline is gathered into a
//! [`ReleaseInputs`] once at startup, either from the environment or from
//! command-line flags, and validated into a [`ValidatedRelease`] before any
//! file is touched.

pub mod constants;
pub mod errors;
pub mod paths;

pub use errors::ConfigError;
pub use paths::{parse_prerelease_flag, resolve_target_manifest_path};

use constants::{
    DEFAULT_BUILD_CONFIG_PATH, DEFAULT_CHECKSUM_PATH, DEFAULT_MANIFEST_DIR, DEFAULT_RELEASE_BODY,
    DEFAULT_REPOSITORY, ENV_ARTIFACT_NAME, ENV_GITHUB_OUTPUT, ENV_IS_PRERELEASE, ENV_PLUGIN_GUID,
    ENV_REF_NAME, ENV_RELEASE_BODY, ENV_REPOSITORY,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw release inputs as supplied by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInputs {
    pub is_prerelease: bool,
    pub plugin_guid: Option<String>,
    pub tag_name: Option<String>,
    pub release_body: Option<String>,
    pub repository: Option<String>,
    pub artifact_name: Option<String>,
    pub build_config_path: PathBuf,
    pub checksum_path: PathBuf,
    pub manifest_dir: PathBuf,
    pub github_output: Option<PathBuf>,
}

impl Default for ReleaseInputs {
    fn default() -> Self {
        ReleaseInputs {
            is_prerelease: false,
            plugin_guid: None,
            tag_name: None,
            release_body: None,
            repository: None,
            artifact_name: None,
            build_config_path: PathBuf::from(DEFAULT_BUILD_CONFIG_PATH),
            checksum_path: PathBuf::from(DEFAULT_CHECKSUM_PATH),
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            github_output: None,
        }
    }
}

/// Inputs after validation, with the checksum already read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRelease {
    pub plugin_guid: String,
    pub tag_name: String,
    pub release_body: String,
    pub repository: String,
    pub artifact_name: String,
    pub checksum: String,
    pub build_config_path: PathBuf,
    pub manifest_path: PathBuf,
    pub github_output: Option<PathBuf>,
}

impl ReleaseInputs {
    /// Read inputs from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read inputs through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ReleaseInputs {
            is_prerelease: lookup(ENV_IS_PRERELEASE)
                .as_deref()
                .is_some_and(parse_prerelease_flag),
            plugin_guid: lookup(ENV_PLUGIN_GUID),
            tag_name: lookup(ENV_REF_NAME),
            release_body: lookup(ENV_RELEASE_BODY),
            repository: lookup(ENV_REPOSITORY),
            artifact_name: lookup(ENV_ARTIFACT_NAME),
            github_output: non_empty(lookup(ENV_GITHUB_OUTPUT)).map(PathBuf::from),
            ..Default::default()
        }
    }

    /// Manifest file this release targets
    pub fn manifest_path(&self) -> PathBuf {
        resolve_target_manifest_path(&self.manifest_dir, self.is_prerelease)
    }

    /// Check required inputs and read the checksum
    ///
    /// Required values are checked in a fixed order so the first missing one
    /// is always the one reported. Blank values count as missing.
    pub fn validate(&self) -> Result<ValidatedRelease, ConfigError> {
        let plugin_guid = required(ENV_PLUGIN_GUID, &self.plugin_guid)?;
        let tag_name = required(ENV_REF_NAME, &self.tag_name)?;
        let artifact_name = required(ENV_ARTIFACT_NAME, &self.artifact_name)?;
        let checksum = read_checksum(&self.checksum_path)?;

        let release_body = non_empty(self.release_body.clone())
            .unwrap_or_else(|| DEFAULT_RELEASE_BODY.to_string());
        let repository =
            non_empty(self.repository.clone()).unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());

        Ok(ValidatedRelease {
            plugin_guid,
            tag_name,
            release_body,
            repository,
            artifact_name,
            checksum,
            build_config_path: self.build_config_path.clone(),
            manifest_path: self.manifest_path(),
            github_output: self.github_output.clone(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(var: &'static str, value: &Option<String>) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing { var }),
    }
}

/// Read the checksum file and trim surrounding whitespace
pub fn read_checksum(path: &Path) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!("Read checksum from {:?}", path);
            Ok(content.trim().to_string())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::ChecksumNotFound(path.to_path_buf()))
        }
        Err(err) => Err(ConfigError::Io(err)),
    }
}

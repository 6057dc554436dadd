//! Construction of new version records from release inputs

use crate::build_config::BuildConfig;
use crate::types::VersionEntry;
use chrono::{DateTime, Utc};

/// Timestamp layout used in the manifest (`YYYY-MM-DDTHH:MM:SSZ`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Download URL of a release asset on GitHub
pub fn build_source_url(repository: &str, tag_name: &str, artifact_name: &str) -> String {
    format!(
        "https://github.com/{}/releases/download/{}/{}",
        repository, tag_name, artifact_name
    )
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Release information that, together with a build config, makes a version entry
#[derive(Debug, Clone, Copy)]
pub struct ReleaseInfo<'a> {
    pub tag_name: &'a str,
    pub release_body: &'a str,
    pub repository: &'a str,
    pub artifact_name: &'a str,
    pub checksum: &'a str,
}

impl VersionEntry {
    /// Build a version entry stamped with the current UTC time
    pub fn build(config: &BuildConfig, release: &ReleaseInfo<'_>) -> Self {
        Self::build_at(config, release, Utc::now())
    }

    /// Build a version entry stamped with `at`
    pub fn build_at(config: &BuildConfig, release: &ReleaseInfo<'_>, at: DateTime<Utc>) -> Self {
        VersionEntry {
            version: config.resolve_version(release.tag_name),
            changelog: release.release_body.to_string(),
            timestamp: format_timestamp(at),
            source_url: build_source_url(
                release.repository,
                release.tag_name,
                release.artifact_name,
            ),
            checksum: release.checksum.to_string(),
            target_abi: config.target_abi().to_string(),
        }
    }
}

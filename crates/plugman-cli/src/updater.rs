//! Manifest update flow
//!
//! Runs the release steps in a fixed order: resolve the target manifest,
//! validate inputs, load the build config, build the version entry, load the
//! manifest, upsert, write, and finally emit the pipeline output.

use crate::errors::UpdateError;
use crate::output::emit_output;
use plugman_config::{ReleaseInputs, ValidatedRelease};
use plugman_logger as logger;
use plugman_manifest::{
    BuildConfig, Manifest, ManifestError, ReleaseInfo, UpsertOutcome, VersionEntry,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Render the manifest instead of writing it and skip pipeline output
    pub dry_run: bool,
}

/// Summary of a completed update
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub manifest_path: PathBuf,
    pub version: String,
    pub outcome: UpsertOutcome,
    pub plugin_count: usize,
    /// Manifest text, only set for dry runs
    pub rendered: Option<String>,
}

fn release_info(release: &ValidatedRelease) -> ReleaseInfo<'_> {
    ReleaseInfo {
        tag_name: &release.tag_name,
        release_body: &release.release_body,
        repository: &release.repository,
        artifact_name: &release.artifact_name,
        checksum: &release.checksum,
    }
}

pub struct ManifestUpdater<'a> {
    inputs: &'a ReleaseInputs,
    options: RunOptions,
}

impl<'a> ManifestUpdater<'a> {
    pub fn new(inputs: &'a ReleaseInputs, options: RunOptions) -> Self {
        Self { inputs, options }
    }

    pub fn run(&self) -> Result<UpdateReport, UpdateError> {
        let manifest_path = self.inputs.manifest_path();
        let channel = if self.inputs.is_prerelease {
            "prerelease"
        } else {
            "stable"
        };
        logger::step(&format!(
            "Updating {} manifest {}",
            channel,
            manifest_path.display()
        ));

        let release = self.inputs.validate()?;
        logger::debug(&format!(
            "Plugin {} release {} ({})",
            release.plugin_guid, release.tag_name, release.artifact_name
        ));

        logger::step(&format!(
            "Loading build config {}",
            release.build_config_path.display()
        ));
        let config = BuildConfig::load(&release.build_config_path).map_err(|source| {
            UpdateError::BuildConfig {
                path: release.build_config_path.clone(),
                source,
            }
        })?;

        let entry = VersionEntry::build(&config, &release_info(&release));
        let version = entry.version.clone();
        logger::info(&format!("Version {} -> {}", version, entry.source_url));

        let mut manifest =
            Manifest::load_from_path(&release.manifest_path).map_err(|source| {
                UpdateError::ManifestRead {
                    path: release.manifest_path.clone(),
                    source,
                }
            })?;
        logger::debug(&format!("Manifest holds {} plugins", manifest.len()));

        let outcome = manifest.upsert_plugin(&release.plugin_guid, &config, &entry);
        match outcome {
            UpsertOutcome::Inserted => logger::info(&format!(
                "Added new plugin {} ({})",
                config.name(),
                release.plugin_guid
            )),
            UpsertOutcome::Updated { previous_versions } => logger::info(&format!(
                "Updated plugin {} ({}), {} earlier versions kept",
                config.name(),
                release.plugin_guid,
                previous_versions
            )),
        }

        let write_err = |source: ManifestError| UpdateError::ManifestWrite {
            path: release.manifest_path.clone(),
            source,
        };

        let rendered = if self.options.dry_run {
            logger::step("Dry run: manifest not written");
            Some(manifest.to_pretty_json().map_err(write_err)?)
        } else {
            manifest
                .save_to_path(&release.manifest_path)
                .map_err(write_err)?;
            emit_output(release.github_output.as_deref(), &version).map_err(|source| {
                UpdateError::Output {
                    path: release.github_output.clone().unwrap_or_default(),
                    source,
                }
            })?;
            logger::success(&format!(
                "Manifest {} updated to {}",
                release.manifest_path.display(),
                version
            ));
            None
        };

        Ok(UpdateReport {
            manifest_path: release.manifest_path,
            version,
            outcome,
            plugin_count: manifest.len(),
            rendered,
        })
    }
}

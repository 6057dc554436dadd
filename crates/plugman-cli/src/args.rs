//! Release arguments, each falling back to its pipeline environment variable

use clap::Args;
use plugman_config::constants::{
    DEFAULT_BUILD_CONFIG_PATH, DEFAULT_CHECKSUM_PATH, DEFAULT_MANIFEST_DIR,
};
use plugman_config::{parse_prerelease_flag, ReleaseInputs};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Target the prerelease manifest ("true" or "false")
    #[arg(
        long,
        env = "IS_PRERELEASE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub prerelease: Option<String>,

    /// Plugin GUID, the manifest key
    #[arg(long, env = "PLUGIN_GUID")]
    pub guid: Option<String>,

    /// Release tag name (e.g. v1.2.3)
    #[arg(long, env = "GITHUB_REF_NAME")]
    pub tag: Option<String>,

    /// Changelog text for the release
    #[arg(long, env = "RELEASE_BODY")]
    pub body: Option<String>,

    /// Repository slug (owner/repo) hosting the release assets
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// File name of the released artifact
    #[arg(long, env = "ARTIFACT_NAME")]
    pub artifact: Option<String>,

    /// File holding the artifact checksum
    #[arg(long, default_value = DEFAULT_CHECKSUM_PATH)]
    pub checksum_file: PathBuf,

    /// Plugin build configuration
    #[arg(long, default_value = DEFAULT_BUILD_CONFIG_PATH)]
    pub build_config: PathBuf,

    /// Directory holding manifest.json and manifest-prerelease.json
    #[arg(long, default_value = DEFAULT_MANIFEST_DIR)]
    pub manifest_dir: PathBuf,

    /// File that receives pipeline outputs
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub github_output: Option<String>,

    /// Print the updated manifest instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl ReleaseArgs {
    pub fn to_inputs(&self) -> ReleaseInputs {
        ReleaseInputs {
            is_prerelease: self
                .prerelease
                .as_deref()
                .is_some_and(parse_prerelease_flag),
            plugin_guid: self.guid.clone(),
            tag_name: self.tag.clone(),
            release_body: self.body.clone(),
            repository: self.repository.clone(),
            artifact_name: self.artifact.clone(),
            build_config_path: self.build_config.clone(),
            checksum_path: self.checksum_file.clone(),
            manifest_dir: self.manifest_dir.clone(),
            github_output: self
                .github_output
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

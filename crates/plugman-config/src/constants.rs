//! Environment variable names and default locations

pub const ENV_IS_PRERELEASE: &str = "IS_PRERELEASE";
pub const ENV_PLUGIN_GUID: &str = "PLUGIN_GUID";
pub const ENV_REF_NAME: &str = "GITHUB_REF_NAME";
pub const ENV_RELEASE_BODY: &str = "RELEASE_BODY";
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_ARTIFACT_NAME: &str = "ARTIFACT_NAME";
pub const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

pub const DEFAULT_MANIFEST_DIR: &str = "manifest-repo";
pub const DEFAULT_BUILD_CONFIG_PATH: &str = "plugin-repo/build.yaml";
pub const DEFAULT_CHECKSUM_PATH: &str = "checksum.txt";

pub const STABLE_MANIFEST_FILE: &str = "manifest.json";
pub const PRERELEASE_MANIFEST_FILE: &str = "manifest-prerelease.json";

pub const DEFAULT_RELEASE_BODY: &str = "See release notes.";
pub const DEFAULT_REPOSITORY: &str = "unknown/unknown";

/// Key of the line written to the pipeline output file
pub const OUTPUT_VERSION_KEY: &str = "manifest_version";

//! Manifest path selection

use crate::constants::{PRERELEASE_MANIFEST_FILE, STABLE_MANIFEST_FILE};
use std::path::{Path, PathBuf};

/// Interpret a prerelease flag; only a case-insensitive `true` enables it
pub fn parse_prerelease_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Select the stable or prerelease manifest inside `manifest_dir`
pub fn resolve_target_manifest_path(manifest_dir: &Path, is_prerelease: bool) -> PathBuf {
    let file = if is_prerelease {
        PRERELEASE_MANIFEST_FILE
    } else {
        STABLE_MANIFEST_FILE
    };
    manifest_dir.join(file)
}

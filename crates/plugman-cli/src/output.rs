//! Pipeline output emission (`GITHUB_OUTPUT`)

use plugman_config::constants::OUTPUT_VERSION_KEY;
use plugman_logger as logger;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Append `manifest_version=<version>` to the pipeline output file
///
/// Returns `false` without touching anything when no output file is configured.
pub fn emit_output(github_output: Option<&Path>, version: &str) -> io::Result<bool> {
    let Some(path) = github_output else {
        logger::info(&format!(
            "No pipeline output file configured; {}={}",
            OUTPUT_VERSION_KEY, version
        ));
        return Ok(false);
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", OUTPUT_VERSION_KEY, version)?;
    logger::debug(&format!(
        "Wrote {}={} to {}",
        OUTPUT_VERSION_KEY,
        version,
        path.display()
    ));
    Ok(true)
}

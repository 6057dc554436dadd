//! Common types and utilities shared across modules

use clap::Parser;
use std::path::PathBuf;

/// Global CLI options
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Only print warnings and errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        env = "PLUGMAN_LOG_FILE",
        help = "Also write log lines to this file"
    )]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet, warnings and errors only
    /// - 1: step messages (default)
    /// - 2: debug (-v)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

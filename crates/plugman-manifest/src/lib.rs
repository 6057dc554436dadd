//! Plugman Manifest Management
//!
//! Types and operations for the plugin release manifest: the JSON document
//! listing every published plugin with its newest-first version history.
//!
//! A release is recorded in three steps: read the plugin's [`BuildConfig`],
//! build a [`VersionEntry`] for the release, then upsert it into the
//! [`Manifest`] and save.

pub mod build_config;
pub mod errors;
pub mod manifest;
pub mod types;
pub mod version_entry;

pub use build_config::BuildConfig;
pub use errors::ManifestError;
pub use types::{Manifest, PluginEntry, UpsertOutcome, VersionEntry};
pub use version_entry::{build_source_url, format_timestamp, ReleaseInfo};

//! Manifest data model
//!
//! The persisted manifest is a JSON array of plugins, each carrying its
//! metadata and a newest-first list of released versions. Plugin entries are
//! held as raw JSON: an update only rewrites the metadata keys and prepends
//! to `versions` of the matching plugin, so entries written by other tools
//! (extra keys, `null` values, older version layouts) survive byte-for-byte
//! in meaning.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_CATEGORY: &str = "category";
pub const KEY_GUID: &str = "guid";
pub const KEY_NAME: &str = "name";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_OWNER: &str = "owner";
pub const KEY_OVERVIEW: &str = "overview";
pub const KEY_VERSIONS: &str = "versions";

// =============================================================================
// MANIFEST - Ordered plugin list with a guid index
// =============================================================================

/// Top-level manifest: every known plugin and its release history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub(crate) plugins: Vec<PluginEntry>,

    /// Runtime only - guid to index of its first occurrence
    #[serde(skip)]
    pub(crate) guid_index: AHashMap<String, usize>,
}

// =============================================================================
// PLUGIN - One entry per guid
// =============================================================================

/// A single plugin and its version history, kept as the JSON it was read as
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PluginEntry {
    pub(crate) raw: Value,
}

impl PluginEntry {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        PluginEntry {
            raw: Value::Object(map),
        }
    }

    /// String value of `key`, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }

    pub fn guid(&self) -> Option<&str> {
        self.get_str(KEY_GUID)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(KEY_NAME)
    }

    /// Version records, newest first; empty when missing or not a list
    pub fn versions(&self) -> &[Value] {
        self.raw
            .get(KEY_VERSIONS)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

// =============================================================================
// VERSION - Immutable release record
// =============================================================================

/// A released version of a plugin
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: String,
    pub changelog: String,
    pub timestamp: String,
    pub source_url: String,
    pub checksum: String,
    pub target_abi: String,
}

impl VersionEntry {
    /// JSON object with keys in manifest order
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("version".to_string(), Value::from(self.version.as_str()));
        map.insert("changelog".to_string(), Value::from(self.changelog.as_str()));
        map.insert("timestamp".to_string(), Value::from(self.timestamp.as_str()));
        map.insert("sourceUrl".to_string(), Value::from(self.source_url.as_str()));
        map.insert("checksum".to_string(), Value::from(self.checksum.as_str()));
        map.insert("targetAbi".to_string(), Value::from(self.target_abi.as_str()));
        Value::Object(map)
    }
}

/// Result of inserting a release into the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No plugin had the guid; a new entry was appended
    Inserted,
    /// An existing plugin was refreshed and the version prepended
    Updated { previous_versions: usize },
}

impl UpsertOutcome {
    pub fn is_insert(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted)
    }
}

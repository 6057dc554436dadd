//! Manifest operations - loading, upserting and saving
//!
//! Loading is forgiving: a missing file, invalid JSON, or a top level that is
//! not an array yields an empty manifest so a release is never blocked by a
//! corrupt document. Individual entries are never validated; whatever shape
//! they have is written back unchanged. Saving replaces the file atomically
//! through a temporary sibling.

use crate::build_config::BuildConfig;
use crate::errors::ManifestError;
use crate::types::{
    Manifest, PluginEntry, UpsertOutcome, VersionEntry, KEY_CATEGORY, KEY_DESCRIPTION, KEY_GUID,
    KEY_NAME, KEY_OVERVIEW, KEY_OWNER, KEY_VERSIONS,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

const JSON_INDENT: &[u8] = b"    ";

impl Manifest {
    /// Load a manifest, treating a missing or malformed file as empty
    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No manifest at {:?}, starting a new one", path);
                return Ok(Manifest::default());
            }
            Err(err) => return Err(ManifestError::Io(err)),
        };

        match Self::from_json_str(&content) {
            Ok(manifest) => {
                debug!("Loaded {} plugins from {:?}", manifest.len(), path);
                Ok(manifest)
            }
            Err(err) => {
                warn!(
                    "Manifest at {:?} is not valid ({}), starting from an empty manifest",
                    path, err
                );
                Ok(Manifest::default())
            }
        }
    }

    /// Parse a manifest from JSON text; any JSON array is accepted
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let mut manifest: Manifest = serde_json::from_str(content)?;
        manifest.rebuild_indexes();

        let duplicates = manifest.duplicate_guids();
        if !duplicates.is_empty() {
            warn!(
                "Manifest contains duplicate guids {:?}; only the first entry of each is updated",
                duplicates
            );
        }
        Ok(manifest)
    }

    /// Rebuild the guid index; the first occurrence of a guid wins
    fn rebuild_indexes(&mut self) {
        self.guid_index.clear();
        for (idx, plugin) in self.plugins.iter().enumerate() {
            if let Some(guid) = plugin.guid() {
                self.guid_index.entry(guid.to_string()).or_insert(idx);
            }
        }
    }

    /// Guids that appear more than once, in order of first appearance
    pub fn duplicate_guids(&self) -> Vec<String> {
        let mut duplicates: Vec<String> = Vec::new();
        for (idx, plugin) in self.plugins.iter().enumerate() {
            let Some(guid) = plugin.guid() else {
                continue;
            };
            let first = self.guid_index.get(guid).copied();
            if first != Some(idx) && !duplicates.iter().any(|d| d == guid) {
                duplicates.push(guid.to_string());
            }
        }
        duplicates
    }

    pub fn plugins(&self) -> &[PluginEntry] {
        &self.plugins
    }

    #[inline]
    pub fn get_plugin(&self, guid: &str) -> Option<&PluginEntry> {
        self.guid_index
            .get(guid)
            .and_then(|&idx| self.plugins.get(idx))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Record a release for `guid`
    ///
    /// An existing plugin gets its five metadata keys refreshed from `config`
    /// and the version prepended to its history; every other key is left as
    /// it was. An unknown guid is appended as a new plugin whose history is
    /// just this version.
    pub fn upsert_plugin(
        &mut self,
        guid: &str,
        config: &BuildConfig,
        version: &VersionEntry,
    ) -> UpsertOutcome {
        let existing = self
            .guid_index
            .get(guid)
            .copied()
            .and_then(|idx| self.plugins.get_mut(idx))
            .and_then(|plugin| plugin.raw.as_object_mut());

        if let Some(map) = existing {
            set_metadata(map, config);

            let previous_versions = match map.get_mut(KEY_VERSIONS) {
                Some(Value::Array(versions)) => {
                    let previous = versions.len();
                    versions.insert(0, version.to_value());
                    previous
                }
                other => {
                    if other.is_some_and(|v| !v.is_null()) {
                        warn!("Plugin {} has a non-list versions field, replacing it", guid);
                    }
                    map.insert(KEY_VERSIONS.to_string(), Value::Array(vec![version.to_value()]));
                    0
                }
            };
            debug!(
                "Updated plugin {} ({} previous versions)",
                guid, previous_versions
            );
            return UpsertOutcome::Updated { previous_versions };
        }

        let mut map = Map::new();
        map.insert(KEY_CATEGORY.to_string(), Value::Null);
        map.insert(KEY_GUID.to_string(), Value::from(guid));
        set_metadata(&mut map, config);
        map.insert(KEY_VERSIONS.to_string(), Value::Array(vec![version.to_value()]));

        let idx = self.plugins.len();
        self.plugins.push(PluginEntry::from_map(map));
        self.guid_index.insert(guid.to_string(), idx);
        debug!("Added new plugin {}", guid);
        UpsertOutcome::Inserted
    }

    /// Pretty JSON with 4-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> Result<String, ManifestError> {
        let mut buf = Vec::with_capacity(4 * 1024);
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|e| {
            ManifestError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Save manifest to a specific path with atomic write
    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = self.to_pretty_json()?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("json.tmp");
        let written = write_file(&temp_path, content.as_bytes())
            .and_then(|()| std::fs::rename(&temp_path, path));
        if let Err(err) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(ManifestError::Io(err));
        }

        info!("Manifest written to {:?} ({} plugins)", path, self.len());
        Ok(())
    }
}

/// Overwrite the five metadata keys, keeping their position in the object
fn set_metadata(map: &mut Map<String, Value>, config: &BuildConfig) {
    map.insert(KEY_CATEGORY.to_string(), Value::from(config.category()));
    map.insert(KEY_NAME.to_string(), Value::from(config.name()));
    map.insert(KEY_DESCRIPTION.to_string(), Value::from(config.description()));
    map.insert(KEY_OWNER.to_string(), Value::from(config.owner()));
    map.insert(KEY_OVERVIEW.to_string(), Value::from(config.overview()));
}

fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::with_capacity(64 * 1024, file);
    writer.write_all(content)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use crate::build_config::BuildConfig;
    use crate::types::{Manifest, UpsertOutcome, VersionEntry};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn version(v: &str) -> VersionEntry {
        VersionEntry {
            version: v.to_string(),
            changelog: "notes".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            source_url: format!("https://github.com/o/r/releases/download/v{}/a.zip", v),
            checksum: "abc".to_string(),
            target_abi: "10.9.0.0".to_string(),
        }
    }

    fn config(name: &str) -> BuildConfig {
        BuildConfig {
            name: Some(name.to_string()),
            category: Some("Tools".to_string()),
            description: Some("desc".to_string()),
            owner: Some("acme".to_string()),
            overview: Some("over".to_string()),
            ..Default::default()
        }
    }

    fn version_strings(manifest: &Manifest, guid: &str) -> Vec<String> {
        manifest
            .get_plugin(guid)
            .map(|p| p.versions())
            .unwrap_or_default()
            .iter()
            .map(|v| v["version"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    const TWO_PLUGINS: &str = r#"[
    {
        "category": "Old",
        "guid": "G1",
        "name": "Old Name",
        "description": "old",
        "owner": "someone",
        "overview": "old overview",
        "versions": [
            {"version": "1.1.0", "changelog": "b", "timestamp": "2023-02-01T00:00:00Z", "sourceUrl": "u2", "checksum": "c2", "targetAbi": "10.8.0.0"},
            {"version": "1.0.0", "changelog": "a", "timestamp": "2023-01-01T00:00:00Z", "sourceUrl": "u1", "checksum": "c1", "targetAbi": "10.8.0.0"}
        ],
        "imageUrl": "https://example.com/g1.png"
    },
    {
        "category": "Other",
        "guid": "G2",
        "name": "Second",
        "description": "",
        "owner": "x",
        "overview": "",
        "versions": []
    }
]"#;

    #[test]
    fn test_insert_appends_new_plugin() {
        let mut manifest = Manifest::from_json_str(TWO_PLUGINS).unwrap_or_default();
        assert_eq!(manifest.len(), 2);

        let outcome = manifest.upsert_plugin("G3", &config("Third"), &version("0.1.0"));

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(manifest.len(), 3);
        let guids: Vec<Option<&str>> = manifest.plugins().iter().map(|p| p.guid()).collect();
        assert_eq!(guids, vec![Some("G1"), Some("G2"), Some("G3")]);
        let Some(plugin) = manifest.get_plugin("G3") else {
            panic!("plugin G3 missing");
        };
        assert_eq!(plugin.versions(), &[version("0.1.0").to_value()]);
    }

    #[test]
    fn test_new_plugin_key_order() {
        let mut manifest = Manifest::default();
        manifest.upsert_plugin("G1", &config("Foo"), &version("1.0.0"));

        let Some(plugin) = manifest.get_plugin("G1") else {
            panic!("plugin G1 missing");
        };
        let keys: Vec<&str> = plugin
            .as_value()
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(
            keys,
            vec!["category", "guid", "name", "description", "owner", "overview", "versions"]
        );
    }

    #[test]
    fn test_update_prepends_version_and_refreshes_metadata() {
        let mut manifest = Manifest::from_json_str(TWO_PLUGINS).unwrap_or_default();

        let outcome = manifest.upsert_plugin("G1", &config("New Name"), &version("1.2.0"));

        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                previous_versions: 2
            }
        );
        assert_eq!(manifest.len(), 2);
        let Some(plugin) = manifest.get_plugin("G1") else {
            panic!("plugin G1 missing");
        };
        assert_eq!(plugin.name(), Some("New Name"));
        assert_eq!(plugin.get_str("category"), Some("Tools"));
        assert_eq!(plugin.get_str("description"), Some("desc"));
        assert_eq!(plugin.get_str("owner"), Some("acme"));
        assert_eq!(plugin.get_str("overview"), Some("over"));
        assert_eq!(version_strings(&manifest, "G1"), vec!["1.2.0", "1.1.0", "1.0.0"]);
        assert_eq!(plugin.versions()[1]["checksum"], "c2");
        assert_eq!(plugin.versions()[2]["targetAbi"], "10.8.0.0");
        assert_eq!(plugin.get_str("imageUrl"), Some("https://example.com/g1.png"));
    }

    #[test]
    fn test_legacy_entries_survive_update() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("manifest.json");
        let legacy = r#"[
            {"category": "A", "guid": "G1", "name": "Mine", "description": "", "owner": "o", "overview": "",
             "versions": [{"version": "0.9.0", "timestamp": "2022-01-01T00:00:00Z", "sourceUrl": "u", "checksum": "k", "targetAbi": "10.7.0.0"}]},
            {"category": "B", "guid": "OTHER", "name": "Other", "description": null, "owner": "x", "overview": null,
             "versions": [{"version": "2.0.0", "changelog": null, "timestamp": "2023-01-01T00:00:00Z", "sourceUrl": "u", "checksum": "k", "targetAbi": "10.8.0.0"}]},
            {"guid": "THIRD", "name": "Third", "versions": [{"version": "3.0.0"}]}
        ]"#;
        assert!(fs::write(&path, legacy).is_ok());

        let mut manifest = Manifest::load_from_path(&path).unwrap_or_default();
        assert_eq!(manifest.len(), 3);
        manifest.upsert_plugin("G1", &config("Mine"), &version("1.0.0"));
        assert!(manifest.save_to_path(&path).is_ok());

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap_or_default()).unwrap_or_default();
        let plugins = written.as_array().cloned().unwrap_or_default();
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[0]["versions"][0]["version"], "1.0.0");
        assert_eq!(plugins[0]["versions"][1]["version"], "0.9.0");
        assert!(plugins[0]["versions"][1].get("changelog").is_none());
        assert!(plugins[1]["overview"].is_null());
        assert!(plugins[1]["versions"][0]["changelog"].is_null());
        assert_eq!(plugins[2]["versions"], serde_json::json!([{"version": "3.0.0"}]));
        assert!(plugins[2].get("category").is_none());
    }

    #[test]
    fn test_plugin_without_versions_list_gets_one() {
        let json = r#"[{"guid": "G1", "name": "x"}, "stray", 7]"#;
        let mut manifest = Manifest::from_json_str(json).unwrap_or_default();
        assert_eq!(manifest.len(), 3);

        let outcome = manifest.upsert_plugin("G1", &config("x"), &version("1.0.0"));

        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                previous_versions: 0
            }
        );
        assert_eq!(version_strings(&manifest, "G1"), vec!["1.0.0"]);
        assert_eq!(manifest.plugins()[1].as_value(), &Value::from("stray"));
        assert_eq!(manifest.plugins()[2].as_value(), &Value::from(7));
    }

    #[test]
    fn test_duplicate_guid_updates_first_match_only() {
        let json = r#"[
            {"guid": "D", "name": "first", "versions": []},
            {"guid": "D", "name": "second", "versions": []}
        ]"#;
        let mut manifest = Manifest::from_json_str(json).unwrap_or_default();
        assert_eq!(manifest.duplicate_guids(), vec!["D".to_string()]);

        manifest.upsert_plugin("D", &config("updated"), &version("1.0.0"));

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.plugins()[0].name(), Some("updated"));
        assert_eq!(manifest.plugins()[0].versions().len(), 1);
        assert_eq!(manifest.plugins()[1].name(), Some("second"));
        assert!(manifest.plugins()[1].versions().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let loaded = Manifest::load_from_path(&temp_dir.path().join("manifest.json"));
        assert!(loaded.is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("manifest.json");
        assert!(fs::write(&path, "{ this is not json").is_ok());

        let loaded = Manifest::load_from_path(&path);
        assert!(loaded.is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_load_non_array_document_is_empty() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("manifest.json");
        assert!(fs::write(&path, r#"{"guid": "G1"}"#).is_ok());

        let loaded = Manifest::load_from_path(&path);
        assert!(loaded.is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let loaded = Manifest::load_from_path(temp_dir.path());
        assert!(loaded.is_err());
    }

    #[test]
    fn test_save_uses_four_space_indent() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("repo").join("manifest.json");

        let mut manifest = Manifest::default();
        manifest.upsert_plugin("G1", &config("Foo"), &version("1.0.0"));
        assert!(manifest.save_to_path(&path).is_ok(), "Failed to save");

        let content = fs::read_to_string(&path).unwrap_or_default();
        assert!(content.starts_with("[\n    {\n        \"category\": \"Tools\",\n        \"guid\": \"G1\""));
        assert!(content.ends_with("]\n"));
        assert!(!temp_dir.path().join("repo").join("manifest.json.tmp").exists());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        // A directory at the target path makes the final rename fail.
        let path = temp_dir.path().join("manifest.json");
        assert!(fs::create_dir_all(path.join("occupied")).is_ok());

        let mut manifest = Manifest::default();
        manifest.upsert_plugin("G1", &config("Foo"), &version("1.0.0"));

        assert!(manifest.save_to_path(&path).is_err());
        assert!(!temp_dir.path().join("manifest.json.tmp").exists());
    }

    #[test]
    fn test_save_then_load_keeps_extra_keys() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("manifest.json");

        let mut manifest = Manifest::from_json_str(TWO_PLUGINS).unwrap_or_default();
        manifest.upsert_plugin("G2", &config("Second"), &version("2.0.0"));
        assert!(manifest.save_to_path(&path).is_ok());

        let loaded = Manifest::load_from_path(&path).unwrap_or_default();
        assert_eq!(loaded.plugins(), manifest.plugins());
        let content = fs::read_to_string(&path).unwrap_or_default();
        assert!(content.contains("\"imageUrl\": \"https://example.com/g1.png\""));
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("manifest.json");
        assert!(fs::write(&path, "x".repeat(10_000)).is_ok());

        let manifest = Manifest::default();
        assert!(manifest.save_to_path(&path).is_ok());
        assert_eq!(fs::read_to_string(&path).unwrap_or_default(), "[]\n");
    }
}

//! Plugin build configuration (`build.yaml`)
//!
//! Only the metadata keys the manifest needs are read; everything else in the
//! file (framework, artifacts, guid...) is ignored. Values may be any YAML
//! scalar and are normalized to strings, so `version: 1.2` and
//! `targetAbi: 10.9.0.0` behave the same as their quoted forms.

use crate::errors::ManifestError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_NAME: &str = "Unknown Plugin";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_OWNER: &str = "Unknown Owner";
pub const DEFAULT_TARGET_ABI: &str = "unknown";

/// Raw document shape before scalar normalization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawBuildConfig {
    #[serde(default)]
    name: Option<serde_yaml::Value>,
    #[serde(default)]
    category: Option<serde_yaml::Value>,
    #[serde(default)]
    description: Option<serde_yaml::Value>,
    #[serde(default)]
    owner: Option<serde_yaml::Value>,
    #[serde(default)]
    overview: Option<serde_yaml::Value>,
    #[serde(default)]
    version: Option<serde_yaml::Value>,
    #[serde(default)]
    target_abi: Option<serde_yaml::Value>,
}

/// Plugin metadata authored alongside the plugin source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub overview: Option<String>,
    pub version: Option<String>,
    pub target_abi: Option<String>,
}

impl BuildConfig {
    /// Load build configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        debug!("Reading build config from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse build configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawBuildConfig = serde_yaml::from_str(content)?;
        Ok(Self {
            name: scalar_field("name", raw.name)?,
            category: scalar_field("category", raw.category)?,
            description: scalar_field("description", raw.description)?,
            owner: scalar_field("owner", raw.owner)?,
            overview: scalar_field("overview", raw.overview)?,
            version: scalar_field("version", raw.version)?,
            target_abi: scalar_field("targetAbi", raw.target_abi)?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    pub fn overview(&self) -> &str {
        self.overview.as_deref().unwrap_or_default()
    }

    pub fn target_abi(&self) -> &str {
        self.target_abi.as_deref().unwrap_or(DEFAULT_TARGET_ABI)
    }

    /// Explicit version if configured, otherwise the tag with leading `v`s removed
    pub fn resolve_version(&self, tag_name: &str) -> String {
        match &self.version {
            Some(version) => version.clone(),
            None => tag_name.trim_start_matches('v').to_string(),
        }
    }
}

/// Render a YAML scalar as a string; null counts as absent
fn scalar_field(
    key: &str,
    value: Option<serde_yaml::Value>,
) -> Result<Option<String>, ManifestError> {
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(ManifestError::InvalidBuildConfig(format!(
            "field '{}' must be a scalar value",
            key
        ))),
    }
}

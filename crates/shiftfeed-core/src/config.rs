use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::synonyms::{AssignmentField, ShiftField};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    /// Extra source keys per shift field, tried before the built-in ones.
    #[serde(default)]
    pub synonyms: BTreeMap<ShiftField, Vec<String>>,
    /// Extra source keys per assignment field, tried before the built-in ones.
    #[serde(default)]
    pub assignment_synonyms: BTreeMap<AssignmentField, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_location")]
    pub location: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            location: default_location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Confirmation statuses that keep a shift out of the feed.
    #[serde(default = "default_hidden_statuses")]
    pub hidden_statuses: Vec<String>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            hidden_statuses: default_hidden_statuses(),
        }
    }
}

/// Load `.shiftfeed/config.toml` from the project, then the user config dir.
///
/// Falls back to defaults when neither file exists.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<FeedConfig> {
    let project_path = project_root.join(".shiftfeed/config.toml");
    if project_path.exists() {
        return load_config_file(&project_path);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(FeedConfig::default());
    };

    let user_path = config_dir.join("shiftfeed/config.toml");
    if !user_path.exists() {
        return Ok(FeedConfig::default());
    }

    load_config_file(&user_path)
}

/// Load a config file from an explicit path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid config.
pub fn load_config_file(path: &Path) -> Result<FeedConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<FeedConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded feed config");
    Ok(config)
}

pub const DEFAULT_TITLE: &str = "Untitled shift";
pub const DEFAULT_LOCATION: &str = "TBD";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_hidden_statuses() -> Vec<String> {
    vec!["pending".to_string(), "not_published".to_string()]
}

use crate::errors::{ConfigError, HighlightResult};
use crate::project::{EDIT_RATE, MARKER_LABEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for turning highlights into output files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HighlightConfig {
    /// Editor ticks per second
    #[serde(default = "default_edit_rate")]
    pub edit_rate: u64,

    #[serde(default = "default_marker_label")]
    pub marker_label: String,

    /// Project file used as the template for every output project
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Create a folder per video holding the project, the report and the
    /// moved video. When off nothing is written.
    #[serde(default = "default_true")]
    pub organize: bool,

    /// Give the report and the folder the video's modification time
    #[serde(default = "default_true")]
    pub copy_mtime: bool,
}

fn default_edit_rate() -> u64 {
    EDIT_RATE
}

fn default_marker_label() -> String {
    MARKER_LABEL.to_string()
}

fn default_template_path() -> PathBuf {
    PathBuf::from("project-v6.tscproj")
}

fn default_true() -> bool {
    true
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            edit_rate: default_edit_rate(),
            marker_label: default_marker_label(),
            template_path: default_template_path(),
            organize: true,
            copy_mtime: true,
        }
    }
}

/// Load a JSON config file, or the defaults when no path is given
pub fn load_config_or_default(path: Option<&Path>) -> HighlightResult<HighlightConfig> {
    let Some(path) = path else {
        return Ok(HighlightConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("failed to read config {}: {}", path.display(), e))
    })?;
    let config: HighlightConfig = serde_json::from_str(&text).map_err(|e| {
        ConfigError::new(format!("invalid config {}: {}", path.display(), e))
    })?;
    if config.edit_rate == 0 {
        return Err(ConfigError::new("edit_rate must be greater than zero").into());
    }
    Ok(config)
}

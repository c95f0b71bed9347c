//! Settings infrastructure for the expression evaluator.
//!
//! Hosts may ship a settings.toml to tune the refresh interval of volatile
//! sessions and the rendering labels for boolean results. Missing or
//! malformed files degrade to defaults; settings never gate core behavior.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Refresh-timer configuration for volatile sessions.
    #[serde(default)]
    pub refresh: RefreshSettings,

    /// Result-rendering configuration.
    #[serde(default)]
    pub render: RenderSettings,
}

/// Refresh-timer settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSettings {
    /// Interval between re-evaluations of a volatile session, in
    /// milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

/// Labels used when rendering boolean results.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_true_label")]
    pub true_label: String,
    #[serde(default = "default_false_label")]
    pub false_label: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            true_label: default_true_label(),
            false_label: default_false_label(),
        }
    }
}

fn default_true_label() -> String {
    "True".to_string()
}

fn default_false_label() -> String {
    "False".to_string()
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover settings.toml by searching up the directory tree from
/// `start_dir`. Returns the path of the first file found.
pub fn discover_settings(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join("settings.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

//! Client settings stored in settings.toml

use crate::PathManager;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Root URL of the content service (e.g., "https://homestead.example")
    pub base_url: Option<String>,
    /// Per-request timeout; unset means the HTTP client's default
    pub request_timeout_secs: Option<u64>,
    /// Default sort field for listings ("createdAt", "title", "views")
    pub default_sort: Option<String>,
    /// Default sort order ("asc" or "desc")
    pub default_order: Option<String>,
}

impl Settings {
    /// Load settings from the settings file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = PathManager::settings_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }

    /// Save settings to the settings file
    pub fn save(&self) -> Result<(), String> {
        let path = PathManager::settings_path().ok_or("Could not determine settings path")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Pick the base URL: explicit override, then settings file, then default.
    ///
    /// The CLI passes its `--base-url` flag (which clap also fills from
    /// `HOMESTEAD_BASE_URL`) as the override.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        let usable = |url: &&str| !url.trim_end_matches('/').is_empty();
        cli_override
            .filter(usable)
            .or(self.base_url.as_deref().filter(usable))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }
}

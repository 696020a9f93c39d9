use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

pub struct PathManager;

impl PathManager {
    /// Set a custom config directory (tests, portable installs)
    pub fn set_config_dir(path: PathBuf) {
        let _ = CONFIG_DIR_OVERRIDE.set(path);
    }

    pub fn config_dir() -> Option<PathBuf> {
        if let Some(d) = CONFIG_DIR_OVERRIDE.get() {
            return Some(d.clone());
        }
        dirs::config_dir().map(|d| d.join("homestead"))
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.toml"))
    }
}

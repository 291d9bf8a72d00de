use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::settings::KeyNamespace;

/// Configuration of the process hosting the edge effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Screen width in pixels, used for horizontal scale ratios
    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
    /// Screen height in pixels, used for resistance and fling limits
    #[serde(default = "default_screen_height")]
    pub screen_height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Flat TOML file holding the tunables
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
    /// Suffix appended to every tunable key (e.g. "_xposed")
    #[serde(default)]
    pub namespace_suffix: String,
    /// How long a settings snapshot stays fresh
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
            namespace_suffix: String::new(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("overstretch")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_screen_width() -> f32 {
    1080.0
}

fn default_screen_height() -> f32 {
    2200.0
}

fn default_settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

fn default_cache_ttl_ms() -> u64 {
    120
}

impl HostConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load from an explicit path, defaulting when the file does not exist
    pub fn load_from(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(Self::config_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/overstretch/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Settings file path (with tilde expansion)
    pub fn settings_path(&self) -> PathBuf {
        expand_tilde(&self.settings.path)
    }

    pub fn namespace(&self) -> KeyNamespace {
        KeyNamespace::new(self.settings.namespace_suffix.clone())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.settings.cache_ttl_ms)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

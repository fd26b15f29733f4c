use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which editing mode the editor opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultMode {
    #[default]
    Rich,
    Markdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_mode: DefaultMode,

    /// Colors offered by the callout and cell color pickers. Values still
    /// pass the engine's color validation before entering markup.
    #[serde(default = "default_callout_palette")]
    pub callout_palette: Vec<String>,

    /// When true, colors outside the palette are rejected outright
    /// instead of falling back through syntax validation.
    #[serde(default)]
    pub strict_colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: DefaultMode::default(),
            callout_palette: default_callout_palette(),
            strict_colors: false,
        }
    }
}

fn default_callout_palette() -> Vec<String> {
    ["#fff9c4", "#ffe0e0", "#e0f0ff", "#e2f7e2", "#f3e5f5", "#eeeeee"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/dualmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Whether a color is acceptable under this config: palette membership
    /// when strict, any value otherwise (the engine still syntax-checks).
    pub fn allows_color(&self, color: &str) -> bool {
        if self.strict_colors {
            self.callout_palette.iter().any(|c| c == color)
        } else {
            true
        }
    }
}

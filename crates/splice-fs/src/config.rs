//! Format-agnostic loading and saving of recipe and metadata files

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// A structured file format, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Human-readable name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Loads and saves serde types as TOML, JSON or YAML.
///
/// Saving goes through [`io::write_atomic`].
#[derive(Debug, Default)]
pub struct ConfigStore {
    robustness: io::RobustnessConfig,
}

impl ConfigStore {
    /// Create a new ConfigStore with default robustness settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new ConfigStore with custom robustness settings.
    pub fn with_robustness(robustness: io::RobustnessConfig) -> Self {
        Self { robustness }
    }

    /// Load a value from a file, detecting the format from its extension.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = ConfigFormat::from_path(path)?;
        let content = io::read_text(path)?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })
    }

    /// Save a value to a file in the format named by its extension.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = ConfigFormat::from_path(path)?;

        let rendered = match format {
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        };

        let content = rendered.map_err(|message| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })?;

        io::write_atomic(path, content.as_bytes(), self.robustness)
    }
}

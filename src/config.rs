//! Run configuration.
//!
//! Every section has defaults, so an empty YAML file (or none at all) yields
//! a working configuration. Credentials are never read from the file.

use crate::compose::CompositionSettings;
use crate::media::MediaPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid YAML: {0}")]
    Parse(String),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GigaChatSettings {
    pub token_url: String,
    pub completion_url: String,
    pub scope: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
    pub max_tokens: u32,
    pub profanity_check: bool,
    pub token_timeout_secs: u64,
    pub completion_timeout_secs: u64,
}

impl Default for GigaChatSettings {
    fn default() -> Self {
        Self {
            token_url: "https://beta.saluteai.sberdevices.ru/v1/token".to_string(),
            completion_url: "https://beta.saluteai.sberdevices.ru/v1/chat/completions".to_string(),
            scope: "GIGACHAT_API_CORP".to_string(),
            model: "GigaChat-Pro".to_string(),
            temperature: 0.87,
            top_p: 0.47,
            repetition_penalty: 1.07,
            max_tokens: 2048,
            profanity_check: false,
            token_timeout_secs: 2,
            completion_timeout_secs: 120,
        }
    }
}

/// Text-to-image endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KandinskySettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for KandinskySettings {
    fn default() -> Self {
        Self {
            url: "http://0.0.0.0:8188/k31/".to_string(),
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub composition: CompositionSettings,
    pub media: MediaPolicy,
    pub gigachat: GigaChatSettings,
    pub kandinsky: KandinskySettings,
    /// One subdirectory per font family
    pub fonts_dir: PathBuf,
    /// Parent of the per-run output directories
    pub logs_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            composition: CompositionSettings::default(),
            media: MediaPolicy::default(),
            gigachat: GigaChatSettings::default(),
            kandinsky: KandinskySettings::default(),
            fonts_dir: PathBuf::from("fonts"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let composition = &self.composition;
        if composition.title_max_font_size < crate::compose::fit::MIN_FONT_SIZE {
            return Err(ConfigError::Invalid {
                field: "composition.title_max_font_size",
                reason: format!(
                    "{} is below the minimum font size {}",
                    composition.title_max_font_size,
                    crate::compose::fit::MIN_FONT_SIZE
                ),
            });
        }
        if !(composition.body_font_coefficient > 0.0 && composition.body_font_coefficient <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "composition.body_font_coefficient",
                reason: format!("{} is outside (0, 1]", composition.body_font_coefficient),
            });
        }
        if !(0.0..=1.0).contains(&composition.overlay_alpha) {
            return Err(ConfigError::Invalid {
                field: "composition.overlay_alpha",
                reason: format!("{} is outside [0, 1]", composition.overlay_alpha),
            });
        }
        if self.media.image_weight == 0 && self.media.background_weight == 0 {
            return Err(ConfigError::Invalid {
                field: "media",
                reason: "image_weight and background_weight are both zero".to_string(),
            });
        }
        if self.media.image_sizes.is_empty() {
            return Err(ConfigError::Invalid {
                field: "media.image_sizes",
                reason: "at least one size is required".to_string(),
            });
        }
        let sizes = self
            .media
            .image_sizes
            .iter()
            .chain(std::iter::once(&self.media.background_size));
        for &(width, height) in sizes {
            if width == 0 || height == 0 {
                return Err(ConfigError::Invalid {
                    field: "media",
                    reason: format!("image size {}x{} has a zero side", width, height),
                });
            }
        }
        Ok(())
    }
}

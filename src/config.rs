//! YAML configuration for the recommendation pipeline.
//!
//! Names the model bundle and catalog artifacts and optionally overrides the
//! values used to fill in user-profile requests.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1"
//! name: "production"
//!
//! model_path: "model_rekomendasi_makanan.json"
//! catalog_path: "katalog_makanan.json"
//!
//! defaults:
//!   kalori: 350.5
//!   tipe_diet: "Normal"
//!
//! max_recommendations: 20
//! ```
//!
//! Relative artifact paths in a file loaded with [`PipelineConfig::from_file`]
//! resolve against the directory containing that file.

use std::fs;
use std::path::{Path, PathBuf};

use catalog::ColumnMeans;
use features::{FeatureDefaults, NutritionMeans};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Serialized model bundle (JSON)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Pre-clustered catalog (JSON array). Recommendations are disabled
    /// when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// User-profile default overrides
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Upper bound on items returned per recommendation list
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            model_path: default_model_path(),
            catalog_path: None,
            defaults: DefaultsConfig::default(),
            max_recommendations: default_max_recommendations(),
        }
    }
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.model_path.is_relative() {
            self.model_path = base.join(&self.model_path);
        }
        if let Some(catalog) = self.catalog_path.as_mut() {
            if catalog.is_relative() {
                *catalog = base.join(&*catalog);
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "model_path must not be empty".to_string(),
            ));
        }

        if self.max_recommendations == 0 {
            return Err(ConfigLoadError::Validation(
                "max_recommendations must be > 0".to_string(),
            ));
        }

        self.defaults.validate()
    }
}

/// Per-column overrides for user-profile defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub kalori: Option<f64>,
    #[serde(default)]
    pub karbohidrat: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub tipe_diet: Option<String>,
}

impl DefaultsConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (name, value) in [
            ("kalori", self.kalori),
            ("karbohidrat", self.karbohidrat),
            ("protein", self.protein),
        ] {
            if matches!(value, Some(v) if !v.is_finite()) {
                return Err(ConfigLoadError::Validation(format!(
                    "defaults.{name} must be finite"
                )));
            }
        }
        if matches!(&self.tipe_diet, Some(diet) if diet.trim().is_empty()) {
            return Err(ConfigLoadError::Validation(
                "defaults.tipe_diet must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve each column independently: override, then catalog mean, then
    /// bundle mean, then the built-in fallback.
    pub fn resolve(
        &self,
        catalog_means: ColumnMeans,
        bundle_means: Option<NutritionMeans>,
    ) -> FeatureDefaults {
        let fallback = bundle_means.unwrap_or_default();

        FeatureDefaults {
            means: NutritionMeans {
                kalori: self
                    .kalori
                    .or(catalog_means.kalori)
                    .unwrap_or(fallback.kalori),
                karbohidrat: self
                    .karbohidrat
                    .or(catalog_means.karbohidrat)
                    .unwrap_or(fallback.karbohidrat),
                protein: self
                    .protein
                    .or(catalog_means.protein)
                    .unwrap_or(fallback.protein),
            },
            tipe_diet: self.tipe_diet.clone(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model_rekomendasi_makanan.json")
}

fn default_max_recommendations() -> usize {
    20
}

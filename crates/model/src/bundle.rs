//! Serialized model bundle.
//!
//! Training happens offline; the exported bundle is a single JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "features": ["kalori", "karbohidrat", "protein", "harga", "tipe_diet", "level_harga"],
//!   "scaler": { "mean": [0, 0, 0, 0, 0, 0], "scale": [100, 10, 10, 10000, 1, 1] },
//!   "kmeans": { "centroids": [[3, 3, 1.5, 1.2, 2, 1]] },
//!   "encoders": {
//!     "tipe_diet":   { "classes": ["Keto", "Normal", "Vegan", "Vegetarian"] },
//!     "level_harga": { "classes": ["Mahal", "Normal", "Premium"] }
//!   },
//!   "reference_means": { "kalori": 350.5, "karbohidrat": 30.2, "protein": 18.9 }
//! }
//! ```
//!
//! Every dimension is cross-checked against `features` on load, so a bundle
//! that would silently mis-assign clusters is rejected up front.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use features::{Feature, FeatureSchema, NutritionMeans, PriceTier};
use serde::Deserialize;

use crate::encoder::LabelEncoder;
use crate::error::ModelError;
use crate::kmeans::KMeansModel;
use crate::scaler::StandardScaler;

pub const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleFile {
    #[serde(default = "default_version")]
    version: u32,
    features: Vec<String>,
    scaler: StandardScaler,
    kmeans: KMeansModel,
    #[serde(default)]
    encoders: BTreeMap<String, LabelEncoder>,
    #[serde(default)]
    reference_means: Option<NutritionMeans>,
}

fn default_version() -> u32 {
    BUNDLE_VERSION
}

/// Validated clustering model plus its preprocessing companions.
///
/// Immutable once constructed; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TrainedModelBundle {
    schema: FeatureSchema,
    scaler: StandardScaler,
    kmeans: KMeansModel,
    encoders: HashMap<Feature, LabelEncoder>,
    reference_means: Option<NutritionMeans>,
}

impl TrainedModelBundle {
    pub fn new(
        schema: FeatureSchema,
        scaler: StandardScaler,
        kmeans: KMeansModel,
        encoders: impl IntoIterator<Item = (Feature, LabelEncoder)>,
    ) -> Result<Self, ModelError> {
        let bundle = Self {
            schema,
            scaler,
            kmeans,
            encoders: encoders.into_iter().collect(),
            reference_means: None,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn with_reference_means(mut self, means: NutritionMeans) -> Self {
        self.reference_means = Some(means);
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let bundle = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            features = bundle.schema.len(),
            clusters = bundle.kmeans.n_clusters(),
            "loaded model bundle"
        );
        Ok(bundle)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let file: BundleFile = serde_json::from_str(json)?;
        if file.version != BUNDLE_VERSION {
            return Err(ModelError::UnsupportedVersion(file.version));
        }

        let schema = FeatureSchema::from_names(&file.features)
            .map_err(|err| ModelError::InvalidBundle(err.to_string()))?;

        let encoders = file
            .encoders
            .into_iter()
            .map(|(name, encoder)| {
                Feature::from_name(&name)
                    .filter(|feature| feature.is_categorical())
                    .map(|feature| (feature, encoder))
                    .ok_or_else(|| {
                        ModelError::InvalidBundle(format!(
                            "encoder '{name}' does not name a categorical feature"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bundle = Self::new(schema, file.scaler, file.kmeans, encoders)?;
        match file.reference_means {
            Some(means) => Ok(bundle.with_reference_means(means)),
            None => Ok(bundle),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let dim = self.schema.len();
        self.scaler.validate(dim)?;
        self.kmeans.validate(dim)?;

        for feature in self.schema.iter().filter(|f| f.is_categorical()) {
            match self.encoders.get(&feature) {
                None => {
                    return Err(ModelError::InvalidBundle(format!(
                        "categorical feature '{feature}' has no encoder"
                    )))
                }
                Some(encoder) if encoder.classes().is_empty() => {
                    return Err(ModelError::InvalidBundle(format!(
                        "encoder for '{feature}' has no classes"
                    )))
                }
                Some(_) => {}
            }
        }

        // Every tier the builder can emit must be encodable.
        if let Some(encoder) = self.encoders.get(&Feature::LevelHarga) {
            let missing: Vec<&str> = PriceTier::ALL
                .iter()
                .map(|tier| tier.label())
                .filter(|label| encoder.transform(label).is_none())
                .collect();
            if !missing.is_empty() {
                return Err(ModelError::InvalidBundle(format!(
                    "encoder for 'level_harga' lacks tier(s): {}",
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn kmeans(&self) -> &KMeansModel {
        &self.kmeans
    }

    pub fn encoder(&self, feature: Feature) -> Option<&LabelEncoder> {
        self.encoders.get(&feature)
    }

    pub fn reference_means(&self) -> Option<NutritionMeans> {
        self.reference_means
    }
}

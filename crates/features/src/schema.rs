//! Feature schema: the fixed column order a scaler was fit on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A single model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Kalori,
    Karbohidrat,
    Protein,
    Harga,
    TipeDiet,
    LevelHarga,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Kalori,
        Feature::Karbohidrat,
        Feature::Protein,
        Feature::Harga,
        Feature::TipeDiet,
        Feature::LevelHarga,
    ];

    /// Column name as written in bundles and request payloads.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Kalori => "kalori",
            Feature::Karbohidrat => "karbohidrat",
            Feature::Protein => "protein",
            Feature::Harga => "harga",
            Feature::TipeDiet => "tipe_diet",
            Feature::LevelHarga => "level_harga",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Categorical columns are label-encoded by the model before scaling.
    pub fn is_categorical(self) -> bool {
        matches!(self, Feature::TipeDiet | Feature::LevelHarga)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, duplicate-free list of features.
///
/// Order is a deployment-time contract with the trained scaler: a schema
/// whose order differs from the one used during training silently yields
/// wrong clusters, so bundles carry their schema alongside the weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    pub fn new(features: Vec<Feature>) -> Result<Self, SchemaError> {
        if features.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (idx, feature) in features.iter().enumerate() {
            if features[..idx].contains(feature) {
                return Err(SchemaError::DuplicateFeature(feature.name().to_string()));
            }
        }
        Ok(Self { features })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        let features = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Feature::from_name(name).ok_or_else(|| SchemaError::UnknownFeature(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(features)
    }

    /// `[kalori, karbohidrat, protein, harga, tipe_diet, level_harga]`
    pub fn diet_aware() -> Self {
        Self {
            features: Feature::ALL.to_vec(),
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }
}

use serde::Serialize;

use crate::schema::Feature;
use crate::tier::PriceTier;

/// One slot of a [`FeatureVector`].
///
/// Categorical slots stay as strings here; the model's label encoders turn
/// them into numbers, which is where vocabulary misses are detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(value) => Some(value),
            FeatureValue::Number(_) => None,
        }
    }
}

/// Fixed-order model input assembled from a request payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    slots: Vec<(Feature, FeatureValue)>,
    price: f64,
    price_tier: PriceTier,
}

impl FeatureVector {
    pub(crate) fn new(slots: Vec<(Feature, FeatureValue)>, price: f64) -> Self {
        Self {
            slots,
            price,
            price_tier: PriceTier::from_price(price),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in schema order.
    pub fn slots(&self) -> &[(Feature, FeatureValue)] {
        &self.slots
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.slots.iter().map(|(feature, _)| *feature)
    }

    pub fn get(&self, feature: Feature) -> Option<&FeatureValue> {
        self.slots
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, value)| value)
    }

    /// Item price or user budget the vector was built from.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn price_tier(&self) -> PriceTier {
        self.price_tier
    }
}

//! Price tiering.
//!
//! Prices and budgets are bucketed into three ordinal tiers. The tier is both
//! returned to callers (`level_harga`) and fed to the model as a categorical
//! feature, so its label must match the vocabulary the encoder was fit on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prices strictly below this are [`PriceTier::Normal`].
pub const NORMAL_CEILING: f64 = 18_000.0;

/// Prices up to and including this are [`PriceTier::Expensive`].
pub const EXPENSIVE_CEILING: f64 = 35_000.0;

/// Ordinal price tier derived from a price or budget.
///
/// Serialized with the labels used by the trained `level_harga` encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    /// `price < 18000`
    #[serde(rename = "Normal")]
    Normal,
    /// `18000 <= price <= 35000`
    #[serde(rename = "Mahal")]
    Expensive,
    /// `price > 35000`
    #[serde(rename = "Premium")]
    Premium,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Normal, PriceTier::Expensive, PriceTier::Premium];

    /// Classify a price. Total over every `f64`; NaN lands in `Premium`
    /// because it fails both ceiling comparisons.
    pub fn from_price(price: f64) -> Self {
        if price < NORMAL_CEILING {
            PriceTier::Normal
        } else if price <= EXPENSIVE_CEILING {
            PriceTier::Expensive
        } else {
            PriceTier::Premium
        }
    }

    /// Label as seen by the `level_harga` encoder and in responses.
    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Normal => "Normal",
            PriceTier::Expensive => "Mahal",
            PriceTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for [`PriceTier::from_price`].
pub fn tier(price: f64) -> PriceTier {
    PriceTier::from_price(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_normal_ceiling_is_normal() {
        for price in [-1.0, 0.0, 9_000.0, 17_999.0, 17_999.99] {
            assert_eq!(tier(price), PriceTier::Normal, "price {price}");
        }
    }

    #[test]
    fn boundaries_belong_to_expensive() {
        assert_eq!(tier(18_000.0), PriceTier::Expensive);
        assert_eq!(tier(25_000.0), PriceTier::Expensive);
        assert_eq!(tier(35_000.0), PriceTier::Expensive);
    }

    #[test]
    fn above_expensive_ceiling_is_premium() {
        assert_eq!(tier(35_000.01), PriceTier::Premium);
        assert_eq!(tier(1_000_000.0), PriceTier::Premium);
        assert_eq!(tier(f64::INFINITY), PriceTier::Premium);
    }

    #[test]
    fn labels_match_encoder_vocabulary() {
        assert_eq!(PriceTier::Normal.label(), "Normal");
        assert_eq!(PriceTier::Expensive.label(), "Mahal");
        assert_eq!(PriceTier::Premium.to_string(), "Premium");
        assert_eq!(
            serde_json::to_value(PriceTier::Expensive).unwrap(),
            serde_json::json!("Mahal")
        );
    }
}

//! Feature assembly for the food clustering model.
//!
//! Turns loosely-typed JSON request payloads into the fixed-order
//! [`FeatureVector`] a trained scaler expects, and classifies prices into
//! [`PriceTier`]s.
//!
//! ```rust
//! use features::{BuildMode, FeatureBuilder, FeatureDefaults, FeatureSchema, PriceTier};
//! use serde_json::json;
//!
//! let schema = FeatureSchema::diet_aware();
//! let defaults = FeatureDefaults::default();
//! let builder = FeatureBuilder::new(&schema, &defaults);
//!
//! let vector = builder
//!     .build(&json!({"budget": 15000, "tipe_diet": "Vegan"}), BuildMode::UserProfile)
//!     .unwrap();
//! assert_eq!(vector.len(), schema.len());
//! assert_eq!(vector.price_tier(), PriceTier::Normal);
//! ```

pub mod builder;
pub mod error;
pub mod schema;
pub mod tier;
pub mod vector;

pub use builder::{
    BuildMode, FeatureBuilder, FeatureDefaults, NutritionMeans, RecommendationRequest,
    FALLBACK_KALORI, FALLBACK_KARBOHIDRAT, FALLBACK_PROTEIN,
};
pub use error::{FeatureError, SchemaError};
pub use schema::{Feature, FeatureSchema};
pub use tier::{tier, PriceTier, EXPENSIVE_CEILING, NORMAL_CEILING};
pub use vector::{FeatureValue, FeatureVector};

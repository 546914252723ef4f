//! Request payload to [`FeatureVector`] assembly.
//!
//! Three payload shapes are accepted:
//!
//! | Mode | Required keys | Price slot |
//! |------|---------------|------------|
//! | [`BuildMode::Item`] | `kalori`, `karbohidrat`, `protein`, `harga` (+ `tipe_diet` if the schema uses it) | `harga` |
//! | [`BuildMode::UserProfile`] | `budget` (+ a diet when the schema uses it and no default exists) | `budget` |
//! | [`RecommendationRequest`] | `budget`, `preferensi_diet` | `budget` |
//!
//! In user-profile mode nutrition columns absent from the payload come from
//! [`FeatureDefaults`], normally the reference dataset means.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FeatureError;
use crate::schema::{Feature, FeatureSchema};
use crate::tier::PriceTier;
use crate::vector::{FeatureValue, FeatureVector};

pub const FALLBACK_KALORI: f64 = 350.5;
pub const FALLBACK_KARBOHIDRAT: f64 = 30.2;
pub const FALLBACK_PROTEIN: f64 = 18.9;

pub const BUDGET_KEY: &str = "budget";
pub const DIET_PREFERENCE_KEY: &str = "preferensi_diet";

/// Mean nutrition values of the reference dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionMeans {
    pub kalori: f64,
    pub karbohidrat: f64,
    pub protein: f64,
}

impl Default for NutritionMeans {
    fn default() -> Self {
        Self {
            kalori: FALLBACK_KALORI,
            karbohidrat: FALLBACK_KARBOHIDRAT,
            protein: FALLBACK_PROTEIN,
        }
    }
}

/// Values substituted for fields a user-profile payload leaves out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureDefaults {
    #[serde(default)]
    pub means: NutritionMeans,
    /// Diet used when a user-profile payload names none.
    #[serde(default)]
    pub tipe_diet: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Describe a single food item.
    Item,
    /// Describe a user by budget and, optionally, diet.
    UserProfile,
}

/// `{budget, preferensi_diet}` as posted to the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub budget: f64,
    pub diet_preference: String,
}

impl RecommendationRequest {
    pub fn from_payload(payload: &Value) -> Result<Self, FeatureError> {
        let obj = as_object(payload)?;
        require(obj, &[BUDGET_KEY, DIET_PREFERENCE_KEY])?;
        Ok(Self {
            budget: number_field(obj, BUDGET_KEY)?,
            diet_preference: category_field(obj, DIET_PREFERENCE_KEY)?,
        })
    }
}

/// Assembles feature vectors in the order of a model's schema.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder<'a> {
    schema: &'a FeatureSchema,
    defaults: &'a FeatureDefaults,
}

struct Resolved {
    kalori: f64,
    karbohidrat: f64,
    protein: f64,
    price: f64,
    diet: Option<String>,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(schema: &'a FeatureSchema, defaults: &'a FeatureDefaults) -> Self {
        Self { schema, defaults }
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.schema
    }

    /// Validate `payload` and build a vector for `mode`.
    ///
    /// Missing keys are reported together before any type checks run.
    pub fn build(&self, payload: &Value, mode: BuildMode) -> Result<FeatureVector, FeatureError> {
        let obj = as_object(payload)?;
        let resolved = match mode {
            BuildMode::Item => self.resolve_item(obj)?,
            BuildMode::UserProfile => self.resolve_profile(obj)?,
        };
        Ok(self.assemble(resolved))
    }

    /// Build the user-profile vector behind a recommendation query.
    pub fn build_for_request(&self, request: &RecommendationRequest) -> FeatureVector {
        let means = self.defaults.means;
        self.assemble(Resolved {
            kalori: means.kalori,
            karbohidrat: means.karbohidrat,
            protein: means.protein,
            price: request.budget,
            diet: Some(request.diet_preference.clone()),
        })
    }

    fn resolve_item(&self, obj: &Map<String, Value>) -> Result<Resolved, FeatureError> {
        let needs_diet = self.schema.contains(Feature::TipeDiet);
        let mut required = vec![
            Feature::Kalori.name(),
            Feature::Karbohidrat.name(),
            Feature::Protein.name(),
            Feature::Harga.name(),
        ];
        if needs_diet {
            required.push(Feature::TipeDiet.name());
        }
        require(obj, &required)?;

        let diet = if needs_diet {
            Some(category_field(obj, Feature::TipeDiet.name())?)
        } else {
            None
        };

        Ok(Resolved {
            kalori: number_field(obj, Feature::Kalori.name())?,
            karbohidrat: number_field(obj, Feature::Karbohidrat.name())?,
            protein: number_field(obj, Feature::Protein.name())?,
            price: number_field(obj, Feature::Harga.name())?,
            diet,
        })
    }

    fn resolve_profile(&self, obj: &Map<String, Value>) -> Result<Resolved, FeatureError> {
        let needs_diet = self.schema.contains(Feature::TipeDiet);
        let diet_key = [Feature::TipeDiet.name(), DIET_PREFERENCE_KEY]
            .into_iter()
            .find(|key| obj.contains_key(*key));

        let mut missing = Vec::new();
        if !obj.contains_key(BUDGET_KEY) {
            missing.push(BUDGET_KEY.to_string());
        }
        if needs_diet && diet_key.is_none() && self.defaults.tipe_diet.is_none() {
            missing.push(Feature::TipeDiet.name().to_string());
        }
        if !missing.is_empty() {
            return Err(FeatureError::MissingFields(missing));
        }

        let diet = match diet_key {
            Some(key) => Some(category_field(obj, key)?),
            None => self.defaults.tipe_diet.clone(),
        };
        let means = self.defaults.means;

        Ok(Resolved {
            kalori: optional_number(obj, Feature::Kalori.name())?.unwrap_or(means.kalori),
            karbohidrat: optional_number(obj, Feature::Karbohidrat.name())?
                .unwrap_or(means.karbohidrat),
            protein: optional_number(obj, Feature::Protein.name())?.unwrap_or(means.protein),
            price: number_field(obj, BUDGET_KEY)?,
            diet,
        })
    }

    fn assemble(&self, resolved: Resolved) -> FeatureVector {
        let tier = PriceTier::from_price(resolved.price);
        let slots = self
            .schema
            .iter()
            .filter_map(|feature| {
                let value = match feature {
                    Feature::Kalori => FeatureValue::Number(resolved.kalori),
                    Feature::Karbohidrat => FeatureValue::Number(resolved.karbohidrat),
                    Feature::Protein => FeatureValue::Number(resolved.protein),
                    Feature::Harga => FeatureValue::Number(resolved.price),
                    // Presence is checked by the resolve step whenever the schema needs it.
                    Feature::TipeDiet => FeatureValue::Category(resolved.diet.clone()?),
                    Feature::LevelHarga => FeatureValue::Category(tier.label().to_string()),
                };
                Some((feature, value))
            })
            .collect();
        FeatureVector::new(slots, resolved.price)
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, FeatureError> {
    payload.as_object().ok_or(FeatureError::NotAnObject)
}

fn require(obj: &Map<String, Value>, keys: &[&str]) -> Result<(), FeatureError> {
    let missing: Vec<String> = keys
        .iter()
        .filter(|key| !obj.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FeatureError::MissingFields(missing))
    }
}

fn number_field(obj: &Map<String, Value>, field: &str) -> Result<f64, FeatureError> {
    match obj.get(field) {
        Some(value) => parse_number(field, value),
        None => Err(FeatureError::MissingFields(vec![field.to_string()])),
    }
}

fn optional_number(obj: &Map<String, Value>, field: &str) -> Result<Option<f64>, FeatureError> {
    obj.get(field)
        .map(|value| parse_number(field, value))
        .transpose()
}

/// Accepts JSON numbers and numeric strings; rejects non-finite results.
fn parse_number(field: &str, value: &Value) -> Result<f64, FeatureError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(FeatureError::NotNumeric {
            field: field.to_string(),
            found: value.to_string(),
        }),
    }
}

fn category_field(obj: &Map<String, Value>, field: &str) -> Result<String, FeatureError> {
    match obj.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(_) => Err(FeatureError::InvalidCategory {
            field: field.to_string(),
        }),
        None => Err(FeatureError::MissingFields(vec![field.to_string()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> FeatureDefaults {
        FeatureDefaults::default()
    }

    fn item_payload() -> Value {
        json!({
            "kalori": 600,
            "karbohidrat": 10.5,
            "protein": "40",
            "harga": 50000,
            "tipe_diet": "Keto",
        })
    }

    #[test]
    fn item_vector_follows_schema_order() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let vector = builder.build(&item_payload(), BuildMode::Item).unwrap();

        assert_eq!(
            vector.slots(),
            &[
                (Feature::Kalori, FeatureValue::Number(600.0)),
                (Feature::Karbohidrat, FeatureValue::Number(10.5)),
                (Feature::Protein, FeatureValue::Number(40.0)),
                (Feature::Harga, FeatureValue::Number(50000.0)),
                (Feature::TipeDiet, FeatureValue::Category("Keto".into())),
                (Feature::LevelHarga, FeatureValue::Category("Premium".into())),
            ]
        );
        assert_eq!(vector.price_tier(), PriceTier::Premium);
    }

    #[test]
    fn reordered_schema_reorders_vector() {
        let schema = FeatureSchema::from_names(&["harga", "protein", "kalori"]).unwrap();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let vector = builder.build(&item_payload(), BuildMode::Item).unwrap();
        let values: Vec<_> = vector
            .slots()
            .iter()
            .map(|(_, v)| v.as_number().unwrap())
            .collect();
        assert_eq!(values, vec![50000.0, 40.0, 600.0]);
    }

    #[test]
    fn each_missing_item_key_is_named() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        for key in ["kalori", "karbohidrat", "protein", "harga", "tipe_diet"] {
            let mut payload = item_payload();
            payload.as_object_mut().unwrap().remove(key);
            let err = builder.build(&payload, BuildMode::Item).unwrap_err();
            assert_eq!(err, FeatureError::MissingFields(vec![key.to_string()]));
        }
    }

    #[test]
    fn diet_not_required_when_schema_omits_it() {
        let schema = FeatureSchema::from_names(&["kalori", "karbohidrat", "protein", "harga"]).unwrap();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let payload = json!({"kalori": 1, "karbohidrat": 2, "protein": 3, "harga": 4});
        let vector = builder.build(&payload, BuildMode::Item).unwrap();
        assert_eq!(vector.len(), 4);
        assert!(vector.get(Feature::TipeDiet).is_none());
    }

    #[test]
    fn non_numeric_value_names_field() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        for bad in [json!("banyak"), json!(true), json!(null), json!([1])] {
            let mut payload = item_payload();
            payload["kalori"] = bad;
            let err = builder.build(&payload, BuildMode::Item).unwrap_err();
            assert!(
                matches!(&err, FeatureError::NotNumeric { field, .. } if field == "kalori"),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn blank_diet_is_rejected() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let mut payload = item_payload();
        payload["tipe_diet"] = json!("  ");
        assert_eq!(
            builder.build(&payload, BuildMode::Item).unwrap_err(),
            FeatureError::InvalidCategory {
                field: "tipe_diet".into()
            }
        );
    }

    #[test]
    fn profile_fills_nutrition_from_defaults() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let vector = builder
            .build(&json!({"budget": 15000, "tipe_diet": "Vegan"}), BuildMode::UserProfile)
            .unwrap();

        assert_eq!(vector.get(Feature::Kalori), Some(&FeatureValue::Number(FALLBACK_KALORI)));
        assert_eq!(
            vector.get(Feature::Karbohidrat),
            Some(&FeatureValue::Number(FALLBACK_KARBOHIDRAT))
        );
        assert_eq!(vector.get(Feature::Protein), Some(&FeatureValue::Number(FALLBACK_PROTEIN)));
        assert_eq!(vector.get(Feature::Harga), Some(&FeatureValue::Number(15000.0)));
        assert_eq!(
            vector.get(Feature::LevelHarga),
            Some(&FeatureValue::Category("Normal".into()))
        );
    }

    #[test]
    fn profile_payload_overrides_defaults() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let vector = builder
            .build(
                &json!({"budget": "20000", "tipe_diet": "Keto", "protein": 55}),
                BuildMode::UserProfile,
            )
            .unwrap();
        assert_eq!(vector.get(Feature::Protein), Some(&FeatureValue::Number(55.0)));
        assert_eq!(vector.price_tier(), PriceTier::Expensive);
    }

    #[test]
    fn profile_requires_budget() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);

        let err = builder
            .build(&json!({"tipe_diet": "Vegan"}), BuildMode::UserProfile)
            .unwrap_err();
        assert_eq!(err, FeatureError::MissingFields(vec!["budget".into()]));
    }

    #[test]
    fn profile_diet_falls_back_to_default_then_errors() {
        let schema = FeatureSchema::diet_aware();
        let without = defaults();
        let err = FeatureBuilder::new(&schema, &without)
            .build(&json!({"budget": 10000}), BuildMode::UserProfile)
            .unwrap_err();
        assert_eq!(err, FeatureError::MissingFields(vec!["tipe_diet".into()]));

        let with = FeatureDefaults {
            tipe_diet: Some("Normal".into()),
            ..defaults()
        };
        let vector = FeatureBuilder::new(&schema, &with)
            .build(&json!({"budget": 10000}), BuildMode::UserProfile)
            .unwrap();
        assert_eq!(
            vector.get(Feature::TipeDiet),
            Some(&FeatureValue::Category("Normal".into()))
        );
    }

    #[test]
    fn profile_accepts_preference_key() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let vector = FeatureBuilder::new(&schema, &defaults)
            .build(
                &json!({"budget": 10000, "preferensi_diet": "Vegan"}),
                BuildMode::UserProfile,
            )
            .unwrap();
        assert_eq!(
            vector.get(Feature::TipeDiet),
            Some(&FeatureValue::Category("Vegan".into()))
        );
    }

    #[test]
    fn build_is_idempotent() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);
        let payload = item_payload();

        let first = builder.build(&payload, BuildMode::Item).unwrap();
        for _ in 0..5 {
            assert_eq!(builder.build(&payload, BuildMode::Item).unwrap(), first);
        }
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);
        assert_eq!(
            builder.build(&json!([1, 2, 3]), BuildMode::Item).unwrap_err(),
            FeatureError::NotAnObject
        );
    }

    #[test]
    fn recommendation_request_requires_both_keys() {
        assert_eq!(
            RecommendationRequest::from_payload(&json!({})).unwrap_err(),
            FeatureError::MissingFields(vec!["budget".into(), "preferensi_diet".into()])
        );
        assert_eq!(
            RecommendationRequest::from_payload(&json!({"budget": 1})).unwrap_err(),
            FeatureError::MissingFields(vec!["preferensi_diet".into()])
        );

        let request =
            RecommendationRequest::from_payload(&json!({"budget": 15000, "preferensi_diet": "Vegan"}))
                .unwrap();
        assert_eq!(request.budget, 15000.0);
        assert_eq!(request.diet_preference, "Vegan");
    }

    #[test]
    fn request_vector_uses_default_nutrition() {
        let schema = FeatureSchema::diet_aware();
        let defaults = defaults();
        let builder = FeatureBuilder::new(&schema, &defaults);
        let request = RecommendationRequest {
            budget: 40000.0,
            diet_preference: "Vegan".into(),
        };

        let from_request = builder.build_for_request(&request);
        let from_payload = builder
            .build(&json!({"budget": 40000, "tipe_diet": "Vegan"}), BuildMode::UserProfile)
            .unwrap();
        assert_eq!(from_request, from_payload);
        assert_eq!(from_request.price_tier(), PriceTier::Premium);
    }
}

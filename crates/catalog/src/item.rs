use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of the pre-clustered food table.
///
/// Keys the filter does not look at are kept in `extra` and serialized back
/// unchanged, so display fields (images, descriptions, ...) round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "nama")]
    pub name: String,

    pub cluster: usize,

    #[serde(rename = "harga")]
    pub price: f64,

    #[serde(rename = "tipe_diet")]
    pub diet_type: String,

    #[serde(rename = "kalori", default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,

    #[serde(rename = "karbohidrat", default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, cluster: usize, price: f64, diet_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster,
            price,
            diet_type: diet_type.into(),
            calories: None,
            carbohydrates: None,
            protein: None,
            extra: Map::new(),
        }
    }

    pub fn with_nutrition(mut self, calories: f64, carbohydrates: f64, protein: f64) -> Self {
        self.calories = Some(calories);
        self.carbohydrates = Some(carbohydrates);
        self.protein = Some(protein);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_columns_round_trip() {
        let row = json!({
            "nama": "Gado-gado",
            "cluster": 0,
            "harga": 15000,
            "tipe_diet": "Vegetarian",
            "kalori": 320,
            "gambar": "gado.jpg",
            "deskripsi": "Sayur dengan saus kacang"
        });

        let item: CatalogItem = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(item.name, "Gado-gado");
        assert_eq!(item.calories, Some(320.0));
        assert_eq!(item.protein, None);
        assert_eq!(item.extra.get("gambar"), Some(&json!("gado.jpg")));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["gambar"], row["gambar"]);
        assert_eq!(back["deskripsi"], row["deskripsi"]);
        assert!(back.get("protein").is_none());
    }
}

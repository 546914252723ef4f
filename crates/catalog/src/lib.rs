//! Read-only, pre-clustered food catalog.
//!
//! The catalog is the table the recommendation endpoint filters after a
//! cluster has been predicted. It is loaded once from a JSON array and never
//! mutated afterwards. It doubles as the reference dataset whose nutrition
//! means fill in user-profile feature vectors.

pub mod error;
pub mod filter;
pub mod item;

use std::fs;
use std::path::Path;

use features::NutritionMeans;

pub use error::CatalogError;
pub use filter::{filter, FilterOutcome};
pub use item::CatalogItem;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        for (row, item) in items.iter().enumerate() {
            let reason = if item.name.trim().is_empty() {
                Some("name is empty")
            } else if item.price < 0.0 {
                Some("price is negative")
            } else if item.diet_type.trim().is_empty() {
                Some("diet type is empty")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CatalogError::InvalidRow {
                    row,
                    name: item.name.clone(),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(Self { items })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), rows = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filter by cluster, budget and diet. See [`filter()`].
    pub fn recommend(&self, cluster: usize, budget: f64, diet: &str) -> FilterOutcome<'_> {
        filter(&self.items, cluster, budget, diet)
    }

    /// Per-column means over rows that carry a value for that column.
    ///
    /// A column no row fills stays `None`; the others are still reported.
    pub fn nutrition_means(&self) -> ColumnMeans {
        fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
            let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        }

        ColumnMeans {
            kalori: mean(self.items.iter().filter_map(|item| item.calories)),
            karbohidrat: mean(self.items.iter().filter_map(|item| item.carbohydrates)),
            protein: mean(self.items.iter().filter_map(|item| item.protein)),
        }
    }
}

/// Nutrition means computed column by column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnMeans {
    pub kalori: Option<f64>,
    pub karbohidrat: Option<f64>,
    pub protein: Option<f64>,
}

impl ColumnMeans {
    /// All three columns, if every one has a value.
    pub fn complete(&self) -> Option<NutritionMeans> {
        Some(NutritionMeans {
            kalori: self.kalori?,
            karbohidrat: self.karbohidrat?,
            protein: self.protein?,
        })
    }
}

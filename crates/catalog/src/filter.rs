//! Cluster / budget / diet filtering over the catalog.
//!
//! A strict pass keeps items in the predicted cluster that fit the budget and
//! match the diet. Only when that pass is empty is a relaxed pass run, which
//! drops the budget constraint. Both passes keep catalog row order.

use crate::item::CatalogItem;

/// Result of [`filter`]. `fallback` is empty whenever `strict` is not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome<'a> {
    pub strict: Vec<&'a CatalogItem>,
    pub fallback: Vec<&'a CatalogItem>,
}

impl FilterOutcome<'_> {
    /// `true` when at least one item satisfied every constraint.
    pub fn has_exact_matches(&self) -> bool {
        !self.strict.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.strict.is_empty() && self.fallback.is_empty()
    }
}

fn in_segment(item: &CatalogItem, cluster: usize, diet: &str) -> bool {
    item.cluster == cluster && item.diet_type == diet
}

pub fn filter<'a>(
    items: &'a [CatalogItem],
    cluster: usize,
    budget: f64,
    diet: &str,
) -> FilterOutcome<'a> {
    let strict: Vec<_> = items
        .iter()
        .filter(|item| in_segment(item, cluster, diet) && item.price <= budget)
        .collect();

    if !strict.is_empty() {
        return FilterOutcome {
            strict,
            fallback: Vec::new(),
        };
    }

    let fallback = items
        .iter()
        .filter(|item| in_segment(item, cluster, diet))
        .collect();

    FilterOutcome {
        strict,
        fallback,
    }
}

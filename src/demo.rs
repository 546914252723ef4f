//! Bundled sample artifacts.
//!
//! A small three-cluster model and an eight-row catalog, compiled into the
//! binary so tests, benches and local runs work without external files.

use std::sync::Arc;

use crate::{
    Catalog, CatalogError, DefaultsConfig, EngineLoadError, KMeansPredictor, ModelError,
    RecommendationEngine, TrainedModelBundle,
};

pub const DEMO_BUNDLE_JSON: &str = include_str!("../demos/model_bundle.json");
pub const DEMO_CATALOG_JSON: &str = include_str!("../demos/catalog.json");

pub fn demo_bundle() -> Result<TrainedModelBundle, ModelError> {
    TrainedModelBundle::from_json(DEMO_BUNDLE_JSON)
}

pub fn demo_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(DEMO_CATALOG_JSON)
}

/// Engine over the sample artifacts, with defaults resolved the same way
/// [`RecommendationEngine::from_config`] resolves them.
pub fn demo_engine() -> Result<RecommendationEngine, EngineLoadError> {
    let bundle = demo_bundle()?;
    let catalog = demo_catalog()?;
    let defaults =
        DefaultsConfig::default().resolve(catalog.nutrition_means(), bundle.reference_means());
    Ok(RecommendationEngine::new(
        Arc::new(KMeansPredictor::new(bundle)),
        Some(catalog),
        defaults,
    ))
}

//! End-to-end scenarios over the bundled demo artifacts.

use foodrec::demo::demo_engine;
use foodrec::{PipelineConfig, PriceTier, RecommendationEngine};
use serde_json::json;
use std::path::PathBuf;

fn names(items: &[foodrec::CatalogItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn food_item_is_clustered_with_price_tier() {
    let engine = demo_engine().unwrap();

    let premium = engine
        .predict_food_cluster(&json!({
            "kalori": 600, "karbohidrat": 10, "protein": 40, "harga": 50000, "tipe_diet": "Keto"
        }))
        .unwrap();
    assert_eq!(premium.cluster, 2);
    assert_eq!(premium.price_tier, PriceTier::Premium);

    let mahal = engine
        .predict_food_cluster(&json!({
            "kalori": 500, "karbohidrat": 50, "protein": 25, "harga": 25000, "tipe_diet": "Normal"
        }))
        .unwrap();
    assert_eq!(mahal.cluster, 1);
    assert_eq!(mahal.price_tier, PriceTier::Expensive);
}

#[test]
fn user_profile_uses_reference_means() {
    let engine = demo_engine().unwrap();
    let prediction = engine
        .user_cluster(&json!({"budget": 30000, "tipe_diet": "Normal"}))
        .unwrap();
    assert_eq!(prediction.cluster, 1);
    assert_eq!(prediction.price_tier, PriceTier::Expensive);

    let serialized = serde_json::to_value(prediction).unwrap();
    assert_eq!(serialized, json!({"cluster": 1, "level_harga": "Mahal"}));
}

#[test]
fn recommendations_within_budget() {
    let engine = demo_engine().unwrap();
    let rec = engine
        .recommend(&json!({"budget": 15000, "preferensi_diet": "Vegan"}))
        .unwrap();

    assert_eq!(rec.cluster, 0);
    assert!(rec.has_exact_matches());
    assert_eq!(names(&rec.matches), vec!["Salad Quinoa", "Tumis Tahu"]);
    assert!(rec.alternatives.is_empty());
}

#[test]
fn recommendations_fall_back_to_over_budget_items() {
    let engine = demo_engine().unwrap();
    let rec = engine
        .recommend(&json!({"budget": 10000, "preferensi_diet": "Vegan"}))
        .unwrap();

    assert_eq!(rec.cluster, 0);
    assert!(rec.matches.is_empty());
    assert_eq!(
        names(&rec.alternatives),
        vec!["Salad Quinoa", "Tumis Tahu", "Buddha Bowl"]
    );
    for item in &rec.alternatives {
        assert_eq!(item.cluster, rec.cluster);
        assert_eq!(item.diet_type, "Vegan");
    }
}

#[test]
fn every_match_satisfies_all_constraints() {
    let engine = demo_engine().unwrap();
    for (budget, diet) in [(30000, "Normal"), (50000, "Keto"), (15000, "Vegetarian")] {
        let rec = engine
            .recommend(&json!({"budget": budget, "preferensi_diet": diet}))
            .unwrap();
        for item in &rec.matches {
            assert_eq!(item.cluster, rec.cluster);
            assert_eq!(item.diet_type, diet);
            assert!(item.price <= budget as f64);
        }
    }
}

#[test]
fn keto_budget_keeps_only_affordable_items() {
    let engine = demo_engine().unwrap();
    let rec = engine
        .recommend(&json!({"budget": 50000, "preferensi_diet": "Keto"}))
        .unwrap();
    assert_eq!(rec.cluster, 2);
    assert_eq!(names(&rec.matches), vec!["Ayam Panggang Keto"]);
}

#[test]
fn engine_loads_from_pipeline_config() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/pipeline.yaml");
    let config = PipelineConfig::from_file(&path).unwrap();
    let engine = RecommendationEngine::from_config(&config).unwrap();

    assert_eq!(engine.predictor().n_clusters(), 3);
    assert_eq!(engine.catalog().map(|c| c.len()), Some(8));
    assert_eq!(engine.max_recommendations(), 20);
    assert_eq!(engine.defaults().means.kalori, 442.5);

    let rec = engine
        .recommend(&json!({"budget": 15000, "preferensi_diet": "Vegan"}))
        .unwrap();
    assert_eq!(names(&rec.matches), vec!["Salad Quinoa", "Tumis Tahu"]);
}

#[test]
fn catalog_free_config_serves_clusters_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("model.json"),
        foodrec::demo::DEMO_BUNDLE_JSON,
    )
    .unwrap();
    let yaml = dir.path().join("pipeline.yaml");
    std::fs::write(&yaml, "version: \"1\"\nmodel_path: model.json\n").unwrap();

    let engine =
        RecommendationEngine::from_config(&PipelineConfig::from_file(&yaml).unwrap()).unwrap();
    assert!(engine.catalog().is_none());
    // Bundle reference means are used when no catalog supplies them.
    assert_eq!(engine.defaults().means.kalori, 350.5);
    assert_eq!(
        engine
            .user_cluster(&json!({"budget": 15000, "tipe_diet": "Vegan"}))
            .unwrap()
            .cluster,
        0
    );
}

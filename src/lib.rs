//! Workspace umbrella crate for the food recommendation service.
//!
//! This crate stitches feature assembly, cluster prediction and catalog
//! filtering into one [`RecommendationEngine`]: an explicitly constructed,
//! immutable context that request handlers share behind an `Arc`.
//!
//! ```text
//! payload ─► FeatureBuilder ─► ClusterPredictor ─► (Catalog filter) ─► response
//! ```

pub mod config;
pub mod demo;

pub use catalog::{filter, Catalog, CatalogError, CatalogItem, ColumnMeans, FilterOutcome};
pub use config::{ConfigLoadError, DefaultsConfig, PipelineConfig};
pub use features::{
    tier, BuildMode, Feature, FeatureBuilder, FeatureDefaults, FeatureError, FeatureSchema,
    FeatureValue, FeatureVector, NutritionMeans, PriceTier, RecommendationRequest,
};
pub use model::{
    ClusterId, ClusterPredictor, KMeansPredictor, LabelEncoder, ModelError, TrainedModelBundle,
};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

/// Errors a single request can hit while moving through the pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Malformed or missing request fields.
    Validation(FeatureError),
    /// A categorical value the model was never trained on.
    UnknownCategory { feature: String, value: String },
    /// Recommendations were requested but no catalog is loaded.
    CatalogUnavailable,
    /// Any other model failure. Not the caller's fault.
    Model(ModelError),
}

impl PipelineError {
    /// `true` when the request itself is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Validation(_) | PipelineError::UnknownCategory { .. }
        )
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validation(err) => write!(f, "invalid request: {err}"),
            PipelineError::UnknownCategory { feature, value } => {
                write!(f, "{feature} '{value}' is not recognised by the model")
            }
            PipelineError::CatalogUnavailable => write!(f, "recommendation catalog is not loaded"),
            PipelineError::Model(err) => write!(f, "prediction failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Validation(err) => Some(err),
            PipelineError::Model(err) => Some(err),
            PipelineError::UnknownCategory { .. } | PipelineError::CatalogUnavailable => None,
        }
    }
}

impl From<FeatureError> for PipelineError {
    fn from(value: FeatureError) -> Self {
        PipelineError::Validation(value)
    }
}

impl From<ModelError> for PipelineError {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::UnknownCategory { feature, value, .. } => {
                PipelineError::UnknownCategory { feature, value }
            }
            other => PipelineError::Model(other),
        }
    }
}

/// Failures while assembling a [`RecommendationEngine`] at startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineLoadError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("model unavailable: {0}")]
    Model(#[from] ModelError),

    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_build(&self, latency: Duration, result: Result<(), &FeatureError>);
    fn record_predict(&self, latency: Duration, result: Result<ClusterId, &ModelError>);
    fn record_filter(&self, latency: Duration, strict: usize, fallback: usize);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_build(self, result: Result<(), &FeatureError>) {
        self.recorder.record_build(self.start.elapsed(), result);
    }

    fn record_predict(self, result: Result<ClusterId, &ModelError>) {
        self.recorder.record_predict(self.start.elapsed(), result);
    }

    fn record_filter(self, strict: usize, fallback: usize) {
        self.recorder
            .record_filter(self.start.elapsed(), strict, fallback);
    }
}

/// Predicted cluster plus the tier derived from the request's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClusterPrediction {
    pub cluster: ClusterId,
    #[serde(rename = "level_harga")]
    pub price_tier: PriceTier,
}

/// Outcome of a recommendation query.
///
/// `alternatives` is only populated when `matches` is empty: items from the
/// same cluster and diet with the budget constraint dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub cluster: ClusterId,
    #[serde(rename = "rekomendasi")]
    pub matches: Vec<CatalogItem>,
    #[serde(rename = "saran")]
    pub alternatives: Vec<CatalogItem>,
}

impl Recommendation {
    pub fn has_exact_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 20;

/// Read-only request context: model, catalog and resolved defaults.
///
/// Every method takes `&self`, so one engine can serve any number of
/// concurrent requests.
#[derive(Clone)]
pub struct RecommendationEngine {
    predictor: Arc<dyn ClusterPredictor>,
    catalog: Option<Arc<Catalog>>,
    defaults: FeatureDefaults,
    max_recommendations: usize,
}

impl fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("schema", self.predictor.schema())
            .field("clusters", &self.predictor.n_clusters())
            .field("catalog_rows", &self.catalog.as_ref().map(|c| c.len()))
            .field("defaults", &self.defaults)
            .field("max_recommendations", &self.max_recommendations)
            .finish()
    }
}

impl RecommendationEngine {
    pub fn new(
        predictor: Arc<dyn ClusterPredictor>,
        catalog: Option<Catalog>,
        defaults: FeatureDefaults,
    ) -> Self {
        Self {
            predictor,
            catalog: catalog.map(Arc::new),
            defaults,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max.max(1);
        self
    }

    /// Load every artifact named by `config`. Any failure is fatal.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, EngineLoadError> {
        config.validate()?;
        let bundle = TrainedModelBundle::load(&config.model_path)?;
        let catalog = match &config.catalog_path {
            Some(path) => Some(Catalog::load(path)?),
            None => {
                tracing::warn!("no catalog configured; recommendations are disabled");
                None
            }
        };

        let defaults = config.defaults.resolve(
            catalog
                .as_ref()
                .map(Catalog::nutrition_means)
                .unwrap_or_default(),
            bundle.reference_means(),
        );
        tracing::info!(
            kalori = defaults.means.kalori,
            karbohidrat = defaults.means.karbohidrat,
            protein = defaults.means.protein,
            "resolved user-profile defaults"
        );

        Ok(Self::new(Arc::new(KMeansPredictor::new(bundle)), catalog, defaults)
            .with_max_recommendations(config.max_recommendations))
    }

    pub fn predictor(&self) -> &dyn ClusterPredictor {
        self.predictor.as_ref()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }

    pub fn defaults(&self) -> &FeatureDefaults {
        &self.defaults
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    /// Cluster for a single food item `{kalori, karbohidrat, protein, harga, tipe_diet}`.
    pub fn predict_food_cluster(&self, payload: &Value) -> Result<ClusterPrediction, PipelineError> {
        let vector = self.build(payload, BuildMode::Item)?;
        self.classify(&vector)
    }

    /// Cluster for a user profile `{budget, tipe_diet?}`.
    pub fn user_cluster(&self, payload: &Value) -> Result<ClusterPrediction, PipelineError> {
        let vector = self.build(payload, BuildMode::UserProfile)?;
        self.classify(&vector)
    }

    /// Recommendations for `{budget, preferensi_diet}`.
    pub fn recommend(&self, payload: &Value) -> Result<Recommendation, PipelineError> {
        let span = MetricsSpan::start();
        let request = RecommendationRequest::from_payload(payload);
        if let Some(span) = span {
            span.record_build(request.as_ref().map(|_| ()));
        }
        let request = request?;

        let catalog = self.catalog().ok_or(PipelineError::CatalogUnavailable)?;
        let vector = FeatureBuilder::new(self.predictor.schema(), &self.defaults)
            .build_for_request(&request);
        let cluster = self.predict(&vector)?;

        let span = MetricsSpan::start();
        let outcome = catalog.recommend(cluster, request.budget, &request.diet_preference);
        if let Some(span) = span {
            span.record_filter(outcome.strict.len(), outcome.fallback.len());
        }
        tracing::debug!(
            cluster,
            budget = request.budget,
            diet = %request.diet_preference,
            strict = outcome.strict.len(),
            fallback = outcome.fallback.len(),
            "filtered catalog"
        );

        let take = |items: Vec<&CatalogItem>| -> Vec<CatalogItem> {
            items
                .into_iter()
                .take(self.max_recommendations)
                .cloned()
                .collect()
        };
        Ok(Recommendation {
            cluster,
            matches: take(outcome.strict),
            alternatives: take(outcome.fallback),
        })
    }

    fn build(&self, payload: &Value, mode: BuildMode) -> Result<FeatureVector, PipelineError> {
        let span = MetricsSpan::start();
        let result =
            FeatureBuilder::new(self.predictor.schema(), &self.defaults).build(payload, mode);
        if let Some(span) = span {
            span.record_build(result.as_ref().map(|_| ()));
        }
        Ok(result?)
    }

    fn predict(&self, vector: &FeatureVector) -> Result<ClusterId, PipelineError> {
        let span = MetricsSpan::start();
        let result = self.predictor.predict(vector);
        if let Some(span) = span {
            span.record_predict(result.as_ref().copied());
        }
        Ok(result?)
    }

    fn classify(&self, vector: &FeatureVector) -> Result<ClusterPrediction, PipelineError> {
        Ok(ClusterPrediction {
            cluster: self.predict(vector)?,
            price_tier: vector.price_tier(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMetrics {
        events: Mutex<Vec<String>>,
    }

    impl PipelineMetrics for RecordingMetrics {
        fn record_build(&self, _latency: Duration, result: Result<(), &FeatureError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("build:{}", result.is_ok()));
        }

        fn record_predict(&self, _latency: Duration, result: Result<ClusterId, &ModelError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("predict:{}", result.is_ok()));
        }

        fn record_filter(&self, _latency: Duration, strict: usize, fallback: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("filter:{strict}:{fallback}"));
        }
    }

    #[test]
    fn pipeline_metrics_observe_each_stage() {
        let recorder = Arc::new(RecordingMetrics::default());
        set_pipeline_metrics(Some(recorder.clone()));

        let engine = demo::demo_engine().unwrap();
        engine
            .recommend(&json!({"budget": 15000, "preferensi_diet": "Vegan"}))
            .unwrap();
        let _ = engine.predict_food_cluster(&json!({"kalori": 1}));

        set_pipeline_metrics(None);

        let events = recorder.events.lock().unwrap().clone();
        // Other tests in this binary may run concurrently, so only check
        // that this test's sequence was observed.
        assert!(events.contains(&"build:true".to_string()), "{events:?}");
        assert!(events.contains(&"predict:true".to_string()), "{events:?}");
        assert!(events.contains(&"filter:2:0".to_string()), "{events:?}");
        assert!(events.contains(&"build:false".to_string()), "{events:?}");
    }

    #[test]
    fn model_errors_split_into_client_and_internal() {
        let unknown: PipelineError = ModelError::UnknownCategory {
            feature: "tipe_diet".into(),
            value: "Paleo".into(),
            known: vec![],
        }
        .into();
        assert!(unknown.is_client_error());
        assert_eq!(
            unknown.to_string(),
            "tipe_diet 'Paleo' is not recognised by the model"
        );

        let internal: PipelineError = ModelError::SchemaMismatch("x".into()).into();
        assert!(!internal.is_client_error());
        assert!(matches!(internal, PipelineError::Model(_)));
    }

    #[test]
    fn truncates_to_max_recommendations() {
        let engine = demo::demo_engine().unwrap().with_max_recommendations(1);
        let rec = engine
            .recommend(&json!({"budget": 15000, "preferensi_diet": "Vegan"}))
            .unwrap();
        assert_eq!(rec.matches.len(), 1);
        assert_eq!(rec.matches[0].name, "Salad Quinoa");
    }

    #[test]
    fn engine_without_catalog_still_clusters() {
        let bundle = demo::demo_bundle().unwrap();
        let engine = RecommendationEngine::new(
            Arc::new(KMeansPredictor::new(bundle)),
            None,
            FeatureDefaults::default(),
        );

        assert!(engine
            .user_cluster(&json!({"budget": 15000, "tipe_diet": "Vegan"}))
            .is_ok());
        assert!(matches!(
            engine.recommend(&json!({"budget": 15000, "preferensi_diet": "Vegan"})),
            Err(PipelineError::CatalogUnavailable)
        ));
        // Validation still runs first.
        assert!(matches!(
            engine.recommend(&json!({"budget": 15000})),
            Err(PipelineError::Validation(_))
        ));
    }
}

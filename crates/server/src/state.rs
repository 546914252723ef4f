use crate::config::ServerConfig;
use crate::error::ServerResult;
use foodrec::{PipelineConfig, RecommendationEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Loaded model, catalog and defaults (shared across requests)
    pub engine: Arc<RecommendationEngine>,

    /// Prometheus exposition handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state, loading every pipeline artifact.
    ///
    /// Falls back to the bundled demo artifacts when no pipeline config is set.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let engine = match &config.pipeline_config {
            Some(path) => {
                let pipeline = PipelineConfig::from_file(path)
                    .map_err(foodrec::EngineLoadError::from)?;
                RecommendationEngine::from_config(&pipeline)?
            }
            None => {
                tracing::warn!("no pipeline_config set; serving bundled demo artifacts");
                foodrec::demo::demo_engine()?
            }
        };

        Ok(Self::with_engine(config, engine))
    }

    /// Build state around an already-loaded engine.
    pub fn with_engine(config: ServerConfig, engine: RecommendationEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

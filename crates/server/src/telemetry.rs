//! Structured logging and Prometheus metrics.

use foodrec::{ClusterId, FeatureError, ModelError, PipelineMetrics};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the JSON tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Install the process-wide Prometheus recorder once and return its handle.
pub fn prometheus_handle() -> Option<PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            tracing::info!("installed prometheus recorder");
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to install prometheus recorder");
        }
    }
    PROMETHEUS_HANDLE.get().cloned()
}

/// Forwards pipeline stage timings to the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_build(&self, latency: Duration, result: Result<(), &FeatureError>) {
        let outcome = if result.is_ok() { "ok" } else { "invalid" };
        metrics::histogram!("foodrec_stage_seconds", "stage" => "build")
            .record(latency.as_secs_f64());
        metrics::counter!("foodrec_stage_total", "stage" => "build", "outcome" => outcome)
            .increment(1);
    }

    fn record_predict(&self, latency: Duration, result: Result<ClusterId, &ModelError>) {
        metrics::histogram!("foodrec_stage_seconds", "stage" => "predict")
            .record(latency.as_secs_f64());
        match result {
            Ok(cluster) => {
                metrics::counter!("foodrec_predicted_cluster_total", "cluster" => cluster.to_string())
                    .increment(1);
                metrics::counter!("foodrec_stage_total", "stage" => "predict", "outcome" => "ok")
                    .increment(1);
            }
            Err(err) => {
                let outcome = if matches!(err, ModelError::UnknownCategory { .. }) {
                    "unknown_category"
                } else {
                    "error"
                };
                metrics::counter!("foodrec_stage_total", "stage" => "predict", "outcome" => outcome)
                    .increment(1);
            }
        }
    }

    fn record_filter(&self, latency: Duration, strict: usize, fallback: usize) {
        let outcome = if strict > 0 {
            "matched"
        } else if fallback > 0 {
            "fallback"
        } else {
            "empty"
        };
        metrics::histogram!("foodrec_stage_seconds", "stage" => "filter")
            .record(latency.as_secs_f64());
        metrics::counter!("foodrec_stage_total", "stage" => "filter", "outcome" => outcome)
            .increment(1);
    }
}

/// Count one finished HTTP request.
pub fn record_request(path: &str, status: u16, latency: Duration) {
    metrics::counter!(
        "foodrec_http_requests_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("foodrec_http_request_seconds", "path" => path.to_string())
        .record(latency.as_secs_f64());
}

//! Foodrec Server - HTTP API for food cluster prediction and recommendations
//!
//! Wraps a [`foodrec::RecommendationEngine`] in an axum router. The model
//! bundle and catalog are loaded once at startup and shared read-only by
//! every request.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /predict-food-cluster` - Cluster and price tier of a food item
//! - `POST /get-user-cluster` - Cluster and price tier of a user profile
//! - `POST /rekomendasi` - Catalog items for a budget and diet preference
//! - `GET /` - API information
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with model and catalog status
//! - `GET /metrics` - Prometheus metrics
//!
//! Errors use one body shape:
//!
//! ```json
//! {"error": {"code": "VALIDATION_ERROR", "message": "...", "details": {"fields": ["budget"]}}}
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;

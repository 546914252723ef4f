use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foodrec::{EngineLoadError, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Pipeline(err) => match err {
                PipelineError::Validation(_) | PipelineError::UnknownCategory { .. } => {
                    StatusCode::BAD_REQUEST
                }
                PipelineError::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                PipelineError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ServerError::Pipeline(err) => match err {
                PipelineError::Validation(_) => "VALIDATION_ERROR",
                PipelineError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
                PipelineError::CatalogUnavailable => "CATALOG_UNAVAILABLE",
                PipelineError::Model(_) => "INTERNAL_ERROR",
            },
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    /// Offending field names for validation failures.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Pipeline(PipelineError::Validation(err)) => {
                let fields = err.fields();
                (!fields.is_empty()).then(|| json!({ "fields": fields }))
            }
            ServerError::Pipeline(PipelineError::UnknownCategory { feature, value }) => {
                Some(json!({ "feature": feature, "value": value }))
            }
            _ => None,
        }
    }

    /// Message safe to return to the caller. Internal detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            ServerError::Pipeline(PipelineError::Model(_))
            | ServerError::Internal(_)
            | ServerError::Config(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ServerError::PayloadTooLarge;
        }
        ServerError::BadRequest(err.body_text())
    }
}

impl From<EngineLoadError> for ServerError {
    fn from(err: EngineLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodrec::{FeatureError, ModelError};

    #[test]
    fn pipeline_errors_map_to_status_and_code() {
        let cases = [
            (
                ServerError::from(PipelineError::Validation(FeatureError::MissingFields(vec![
                    "budget".into(),
                ]))),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ServerError::from(PipelineError::UnknownCategory {
                    feature: "tipe_diet".into(),
                    value: "Paleo".into(),
                }),
                StatusCode::BAD_REQUEST,
                "UNKNOWN_CATEGORY",
            ),
            (
                ServerError::from(PipelineError::CatalogUnavailable),
                StatusCode::SERVICE_UNAVAILABLE,
                "CATALOG_UNAVAILABLE",
            ),
            (
                ServerError::from(PipelineError::Model(ModelError::InvalidBundle(
                    "centroids".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (ServerError::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.error_code(), code, "{err}");
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ServerError::from(PipelineError::Model(ModelError::InvalidBundle(
            "secret path".into(),
        )));
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.details().is_none());
    }

    #[test]
    fn validation_details_list_fields() {
        let err = ServerError::from(PipelineError::Validation(FeatureError::MissingFields(vec![
            "budget".into(),
            "preferensi_diet".into(),
        ])));
        assert_eq!(
            err.details(),
            Some(json!({ "fields": ["budget", "preferensi_diet"] }))
        );
    }
}

//! Error types produced by the model crate.
//!
//! Load-time variants ([`Io`](ModelError::Io), [`Parse`](ModelError::Parse),
//! [`InvalidBundle`](ModelError::InvalidBundle),
//! [`UnsupportedVersion`](ModelError::UnsupportedVersion)) mean the model is
//! unavailable and the process must not start. At prediction time only
//! [`UnknownCategory`](ModelError::UnknownCategory) is a caller fault; the
//! rest indicate a wiring bug.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelError {
    #[error("failed to read model bundle '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model bundle: {0}")]
    InvalidBundle(String),

    #[error("unsupported model bundle version: {0}")]
    UnsupportedVersion(u32),

    /// A categorical value absent from the encoder's training vocabulary.
    #[error("{feature} value '{value}' is not recognised by the model")]
    UnknownCategory {
        feature: String,
        value: String,
        known: Vec<String>,
    },

    /// The vector handed to the predictor was not built against its schema.
    #[error("feature vector does not match model schema: {0}")]
    SchemaMismatch(String),
}

impl ModelError {
    /// `true` for failures that make the bundle unusable at startup.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ModelError::Io { .. }
                | ModelError::Parse(_)
                | ModelError::InvalidBundle(_)
                | ModelError::UnsupportedVersion(_)
        )
    }
}

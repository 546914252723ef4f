//! Error types produced by the features crate.
//!
//! [`FeatureError`] covers malformed request payloads and always maps to a
//! client fault. [`SchemaError`] covers malformed feature schemas, which only
//! occur while loading a model bundle.

use thiserror::Error;

/// Request payload validation failures.
///
/// Every variant names the offending field(s) so the message can be returned
/// to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeatureError {
    /// The request body was valid JSON but not an object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// One or more required keys are absent. Listed in schema order.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A numeric field held something that does not parse as a finite number.
    #[error("field '{field}' must be numeric, got {found}")]
    NotNumeric { field: String, found: String },

    /// A categorical field was not a non-empty string.
    #[error("field '{field}' must be a non-empty string")]
    InvalidCategory { field: String },
}

impl FeatureError {
    /// Field names this error refers to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            FeatureError::NotAnObject => Vec::new(),
            FeatureError::MissingFields(fields) => fields.iter().map(String::as_str).collect(),
            FeatureError::NotNumeric { field, .. } | FeatureError::InvalidCategory { field } => {
                vec![field.as_str()]
            }
        }
    }
}

/// Feature schema construction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("feature schema is empty")]
    Empty,

    #[error("unknown feature name '{0}'")]
    UnknownFeature(String),

    #[error("feature '{0}' appears more than once")]
    DuplicateFeature(String),
}

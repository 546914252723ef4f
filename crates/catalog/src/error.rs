use thiserror::Error;

/// Failures while loading the catalog. All are fatal at startup.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog row {row} ('{name}') is invalid: {reason}")]
    InvalidRow {
        row: usize,
        name: String,
        reason: String,
    },
}

use thiserror::Error;

/// Every way a dataset can fail to become available.
///
/// The variants are all fatal to a session: callers must not derive entities
/// from a document that produced any of them.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch dataset: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("dataset request returned HTTP {0}")]
    Status(u16),

    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("dataset contains no categories")]
    Empty,

    #[error("invalid CSV export: {0}")]
    Csv(#[from] csv::Error),
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Malformed(err.to_string())
    }
}

/// Problems with a category configuration table
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

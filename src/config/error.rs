use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read reference file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse reference file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Reference file '{0}' must list at least one entry")]
    Empty(PathBuf),

    #[error("Unknown aggregation level '{0}'")]
    UnknownAggLevel(String),

    #[error("Unknown measurement column '{0}'")]
    UnknownColumn(String),
}

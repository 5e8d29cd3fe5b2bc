use crate::aggregation::error::AggregateError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Unknown measurement column '{0}'")]
    UnknownColumn(String),

    #[error("Unknown aggregation level '{0}'")]
    UnknownAggLevel(String),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("Failed to write plot to '{0}'")]
    Io(PathBuf, #[source] std::io::Error),
}

use crate::types::bucket_pattern::PatternError;
use polars::error::PolarsError;
use polars::prelude::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Required column '{0}' not found in DataFrame")]
    MissingColumn(String),

    #[error("Column '{column}' has type {found}, expected {expected}")]
    InvalidColumnType {
        column: String,
        expected: &'static str,
        found: DataType,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Date range bound could not be parsed")]
    InvalidBound(#[source] PatternError),

    #[error("Output column '{0}' is produced more than once")]
    DuplicateOutputColumn(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

use crate::aggregation::error::AggregateError;
use crate::config::error::ConfigError;
use crate::plot::error::PlotError;
use crate::preaggregate::error::PreaggregateError;
use crate::stations::error::StationsError;
use crate::types::bucket_pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Preaggregate(#[from] PreaggregateError),

    #[error(transparent)]
    Stations(#[from] StationsError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

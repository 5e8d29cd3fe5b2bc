//! Defines the `Statistic` enum, the closed set of reductions that can be applied
//! to a measurement column within a (county, date) bucket.

use polars::prelude::{col, lit, DataType, Expr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A statistic computed over all values of one column within a bucket.
///
/// Missing values (nulls) are ignored by every statistic. When a bucket holds no
/// valid value for a column, the result depends on the statistic:
///
/// * [`Statistic::Count`] yields `0.0`.
/// * [`Statistic::Sum`] yields `0.0` (the empty sum).
/// * Every other statistic yields the missing sentinel `f64::NAN`.
///
/// # Examples
///
/// ```
/// use irish_climate::Statistic;
///
/// let stat: Statistic = "median".parse().unwrap();
/// assert_eq!(stat, Statistic::Median);
/// assert_eq!(stat.to_string(), "median");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Arithmetic mean of the valid values.
    Mean,
    /// Sum of the valid values.
    Sum,
    /// Smallest valid value.
    Min,
    /// Largest valid value.
    Max,
    /// Number of valid (non-missing) values.
    Count,
    /// Median of the valid values.
    Median,
}

/// Returned when a string does not name a known [`Statistic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown statistic '{0}', expected one of mean, sum, min, max, count, median")]
pub struct UnknownStatistic(pub String);

impl Statistic {
    /// All statistics, in their canonical order.
    pub const ALL: [Statistic; 6] = [
        Statistic::Mean,
        Statistic::Sum,
        Statistic::Min,
        Statistic::Max,
        Statistic::Count,
        Statistic::Median,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Sum => "sum",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Count => "count",
            Statistic::Median => "median",
        }
    }

    /// Builds the polars aggregation expression reducing `column` with this statistic.
    ///
    /// The result is always `Float64` so tables of different statistics share a schema.
    /// Undefined reductions are replaced by `NaN`.
    pub(crate) fn expr(&self, column: &str) -> Expr {
        let values = col(column);
        let reduced = match self {
            Statistic::Mean => values.mean(),
            Statistic::Sum => values.sum(),
            Statistic::Min => values.min(),
            Statistic::Max => values.max(),
            Statistic::Count => values.count(),
            Statistic::Median => values.median(),
        }
        .cast(DataType::Float64);

        match self {
            // count is defined for every group, including empty ones
            Statistic::Count => reduced,
            _ => reduced.fill_null(lit(f64::NAN)),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Statistic {
    type Err = UnknownStatistic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatistic(s.to_string()))
    }
}

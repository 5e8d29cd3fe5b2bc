//! County-level aggregation of Irish climate station observations.
//!
//! The core is [`aggregate`], which collapses daily observations into one row per county
//! and time bucket:
//!
//! ```no_run
//! use irish_climate::{aggregate, BucketPattern, Reduction, Statistic};
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let daily = LazyFrame::scan_parquet("data/master.parquet", Default::default())?.collect()?;
//! let pattern: BucketPattern = "%Y-%m".parse()?;
//! let reductions = [
//!     Reduction::new("maxtp", Statistic::Mean),
//!     Reduction::new("rain", Statistic::Sum).alias("total_rain"),
//! ];
//! let monthly = aggregate()
//!     .data(&daily)
//!     .reductions(&reductions)
//!     .pattern(&pattern)
//!     .date_range(("2020-01", "2020-12"))
//!     .call()?;
//! println!("{}", monthly);
//! # Ok(())
//! # }
//! ```
//!
//! Around it sit the batch jobs that feed the dashboard ([`generate_preaggregate`],
//! [`generate_station_points`]) and the line chart built from their output ([`line_plot`]).

mod aggregation;
mod config;
mod error;
mod plot;
mod preaggregate;
mod stations;
mod types;
mod utils;

pub use error::ClimateError;

pub use aggregation::aggregator::{add_bucket_labels, aggregate, COUNTY_COL, DATE_COL, DATE_STR_COL};
pub use aggregation::error::AggregateError;

pub use types::bucket_pattern::{BucketPattern, PatternError, DEFAULT_YEAR};
pub use types::reduction::Reduction;
pub use types::statistic::{Statistic, UnknownStatistic};

pub use config::error::ConfigError;
pub use config::paths::DataPaths;
pub use config::reference::{FigureSettings, ReferenceConfig, YEAR_MONTH_LEVEL};

pub use preaggregate::error::PreaggregateError;
pub use preaggregate::job::{build_preaggregate, generate_preaggregate, load_preaggregate, STAT_COL};

pub use stations::error::StationsError;
pub use stations::points::{
    generate_station_points, load_station_points, prepare_station_points, StationPoint,
};
pub use stations::projection::to_irish_transverse_mercator;

pub use plot::error::PlotError;
pub use plot::line_data::LineData;
pub use plot::line_plot::{line_plot, write_html, NATIONAL_AVERAGE};

pub use utils::title_case;

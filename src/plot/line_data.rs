//! Chart-ready data for the county line plot, derived from the preaggregated table.

use crate::aggregation::aggregator::{add_bucket_labels, aggregate, DATE_COL};
use crate::config::reference::{ReferenceConfig, YEAR_MONTH_LEVEL};
use crate::plot::error::PlotError;
use crate::preaggregate::job::STAT_COL;
use crate::types::statistic::Statistic;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

pub const INDEX_COL: &str = "index";

/// One statistic of the preaggregated data at one aggregation level, with a dense
/// `index` column numbering the distinct dates from 0 in date order. The index is the
/// chart's x coordinate, so gaps in the calendar do not stretch the axis.
#[derive(Debug, Clone)]
pub struct LineData {
    pub statistic: Statistic,
    pub agg_level: String,
    pub frame: DataFrame,
}

impl LineData {
    /// Selects `statistic` from `preaggregate` and brings it to `agg_level`.
    ///
    /// At `year-month` the stored rows are used as they are. Any other level is
    /// re-aggregated from the monthly rows with the same statistic, so a yearly mean
    /// is the mean of the monthly means.
    pub fn from_preaggregate(
        preaggregate: &DataFrame,
        statistic: Statistic,
        agg_level: &str,
        config: &ReferenceConfig,
    ) -> Result<Self, PlotError> {
        let pattern = config
            .bucket_pattern(agg_level)
            .map_err(|_| PlotError::UnknownAggLevel(agg_level.to_string()))?;

        let stat_rows = preaggregate
            .clone()
            .lazy()
            .filter(col(STAT_COL).eq(lit(statistic.name())))
            .collect()?
            .drop(STAT_COL)?;

        let mut frame = if agg_level == YEAR_MONTH_LEVEL {
            stat_rows
        } else {
            // Months stored as NaN are missing, not values, once they are reduced again.
            let missing_as_null: Vec<Expr> = config
                .col_options
                .iter()
                .filter(|column| stat_rows.column(column).is_ok())
                .map(|column| col(column.as_str()).fill_nan(lit(NULL)))
                .collect();
            let monthly = stat_rows.lazy().with_columns(missing_as_null).collect()?;

            let reductions = config.reductions(statistic);
            let mut frame = aggregate()
                .data(&monthly)
                .reductions(&reductions)
                .pattern(pattern)
                .call()?;
            add_bucket_labels(&mut frame, pattern)?;
            frame
        };

        let dates: Vec<Option<NaiveDate>> = frame
            .column(DATE_COL)?
            .cast(&DataType::Date)?
            .date()?
            .as_date_iter()
            .collect();
        let distinct: BTreeSet<NaiveDate> = dates.iter().flatten().copied().collect();
        let positions: BTreeMap<NaiveDate, u32> = distinct
            .iter()
            .zip(0u32..)
            .map(|(date, position)| (*date, position))
            .collect();
        let index: Vec<Option<u32>> = dates
            .iter()
            .map(|date| date.and_then(|date| positions.get(&date).copied()))
            .collect();
        frame.with_column(Series::new(INDEX_COL.into(), index))?;

        debug!(
            "Line data for {} at {}: {} rows over {} dates",
            statistic,
            agg_level,
            frame.height(),
            distinct.len()
        );

        Ok(Self {
            statistic,
            agg_level: agg_level.to_string(),
            frame,
        })
    }
}

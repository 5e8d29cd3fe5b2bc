//! The preaggregation batch job: precomputes every configured statistic at the
//! year-month level and stores the result as one parquet file for the dashboard.

use crate::aggregation::aggregator::{
    add_bucket_labels, aggregate, COUNTY_COL, DATE_COL, DATE_STR_COL,
};
use crate::config::reference::{ReferenceConfig, YEAR_MONTH_LEVEL};
use crate::preaggregate::error::PreaggregateError;
use log::info;
use polars::lazy::dsl::concat;
use polars::prelude::*;
use std::path::Path;

pub const STAT_COL: &str = "stat";

/// Builds the preaggregated table from raw daily observations.
///
/// For every statistic in `config.stat_options`, all configured columns are aggregated
/// per (county, month). Blocks are stacked in statistic order and carry a `stat` column
/// naming their statistic. Columns: `county, date, date_str, <col_options...>, stat`.
///
/// # Errors
///
/// Fails if the configuration has no `year-month` level or if `master` does not satisfy
/// the aggregation input contract (see [`crate::aggregate`]).
pub fn build_preaggregate(
    master: &DataFrame,
    config: &ReferenceConfig,
) -> Result<DataFrame, PreaggregateError> {
    let pattern = config.bucket_pattern(YEAR_MONTH_LEVEL)?;

    let mut ordered_columns = vec![COUNTY_COL, DATE_COL, DATE_STR_COL];
    ordered_columns.extend(config.col_options.iter().map(String::as_str));
    ordered_columns.push(STAT_COL);

    let mut blocks = Vec::with_capacity(config.stat_options.len());
    for statistic in &config.stat_options {
        info!("{} ...", statistic);
        let reductions = config.reductions(*statistic);
        let mut block = aggregate()
            .data(master)
            .reductions(&reductions)
            .pattern(pattern)
            .call()?;
        add_bucket_labels(&mut block, pattern)?;
        block.with_column(Series::new(
            STAT_COL.into(),
            vec![statistic.name(); block.height()],
        ))?;
        blocks.push(block.select(ordered_columns.iter().copied())?.lazy());
    }

    Ok(concat(blocks, UnionArgs::default())?.collect()?)
}

/// Runs the batch job: reads `master_path`, builds the preaggregated table and
/// overwrites `output_path` with it. Returns the number of rows written.
///
/// The output file must already exist; a missing target is treated as a
/// misconfigured deployment and fails before any data is read.
pub fn generate_preaggregate(
    master_path: &Path,
    output_path: &Path,
    config: &ReferenceConfig,
) -> Result<usize, PreaggregateError> {
    if !output_path.exists() {
        return Err(PreaggregateError::OutputPathMissing(
            output_path.to_path_buf(),
        ));
    }

    info!("Loading master data from disk ...");
    let master = load_parquet(master_path)?;
    info!(
        "Performing data aggregation of {} rows to year-month level ...",
        master.height()
    );
    let mut preaggregate = build_preaggregate(&master, config)?;

    info!("Writing pre-aggregated data to disk as .parquet file ...");
    write_parquet(&mut preaggregate, output_path)?;
    info!(
        "Wrote {} pre-aggregated rows to {}",
        preaggregate.height(),
        output_path.display()
    );
    Ok(preaggregate.height())
}

/// Reads a preaggregated table written by [`generate_preaggregate`].
pub fn load_preaggregate(path: &Path) -> Result<DataFrame, PreaggregateError> {
    load_parquet(path)
}

pub(crate) fn load_parquet(path: &Path) -> Result<DataFrame, PreaggregateError> {
    LazyFrame::scan_parquet(path, Default::default())
        .and_then(|frame| frame.collect())
        .map_err(|e| PreaggregateError::ParquetScan(path.to_path_buf(), e))
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), PreaggregateError> {
    let file = std::fs::File::create(path)
        .map_err(|e| PreaggregateError::ParquetWriteIo(path.to_path_buf(), e))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(df)
        .map_err(|e| PreaggregateError::ParquetWritePolars(path.to_path_buf(), e))?;
    Ok(())
}

//! The time-bucketed aggregation of station observations by county and date.

use crate::aggregation::error::AggregateError;
use crate::types::bucket_pattern::{BucketPattern, PatternError};
use crate::types::reduction::Reduction;
use bon::builder;
use log::{debug, warn};
use polars::prelude::*;
use std::collections::HashSet;

pub const COUNTY_COL: &str = "county";
pub const DATE_COL: &str = "date";
pub const DATE_STR_COL: &str = "date_str";

/// Aggregates row-level observations into one row per (county, bucket date).
///
/// Each row's `date` is collapsed with `pattern` (see [`BucketPattern::truncate`]); rows
/// sharing a county and a truncated date form one bucket, and every [`Reduction`] is
/// evaluated independently within each bucket. The result holds `county`, `date` (the
/// canonical bucket date) and one `Float64` column per reduction, named
/// [`Reduction::output_name`], sorted by `county` then `date`.
///
/// Optional filters:
///
/// * `date_range` - inclusive `(lower, upper)` bounds written in `pattern`'s format
///   (e.g. `("2020-01", "2020-06")` for `%Y-%m`). Buckets outside are dropped.
/// * `counties` - only rows whose county is listed are kept.
///
/// Rows with a null `county` or `date` belong to no bucket and are dropped. A filter that
/// matches nothing yields an empty table, not an error.
///
/// # Errors
///
/// * [`AggregateError::MissingColumn`] if `county`, `date` or a reduction column is absent.
/// * [`AggregateError::InvalidColumnType`] if `county` is not a string column, `date` is not
///   a date or datetime column, or a reduction column is not numeric.
/// * [`AggregateError::InvalidBound`] if a `date_range` bound does not match `pattern`.
/// * [`AggregateError::DuplicateOutputColumn`] if two reductions share an output name.
/// * [`AggregateError::Pattern`] if a date cannot be represented by `pattern`.
///
/// # Example
///
/// ```
/// use irish_climate::{aggregate, BucketPattern, Reduction, Statistic};
/// use chrono::NaiveDate;
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
/// let observations = df!(
///     "county" => ["Dublin", "Dublin", "Cork"],
///     "date" => [day(1), day(2), day(1)],
///     "rain" => [1.0, 3.0, 0.5],
/// )?;
///
/// let monthly = aggregate()
///     .data(&observations)
///     .reductions(&[Reduction::new("rain", Statistic::Mean)])
///     .pattern(&BucketPattern::new("%Y-%m")?)
///     .call()?;
///
/// assert_eq!(monthly.height(), 2);
/// # Ok(())
/// # }
/// ```
#[builder]
pub fn aggregate(
    data: &DataFrame,
    reductions: &[Reduction],
    pattern: &BucketPattern,
    date_range: Option<(&str, &str)>,
    counties: Option<&[String]>,
) -> Result<DataFrame, AggregateError> {
    validate_input(data, reductions)?;

    let bounds = date_range
        .map(|(lower, upper)| -> Result<_, PatternError> {
            Ok((pattern.parse(lower)?, pattern.parse(upper)?))
        })
        .transpose()
        .map_err(AggregateError::InvalidBound)?;
    let county_filter: Option<HashSet<&str>> =
        counties.map(|names| names.iter().map(String::as_str).collect());

    let county_values = data.column(COUNTY_COL)?.str()?;
    let date_column = data.column(DATE_COL)?.cast(&DataType::Date)?;
    let date_values = date_column.date()?;

    let mut buckets = Vec::with_capacity(data.height());
    let mut keep = Vec::with_capacity(data.height());
    let mut null_keys = 0usize;
    for (county, date) in county_values.into_iter().zip(date_values.as_date_iter()) {
        let (Some(county), Some(date)) = (county, date) else {
            null_keys += 1;
            buckets.push(None);
            keep.push(false);
            continue;
        };
        // Excluded counties are never truncated, so their dates cannot fail the pattern.
        if !county_filter
            .as_ref()
            .map_or(true, |allowed| allowed.contains(county))
        {
            buckets.push(None);
            keep.push(false);
            continue;
        }
        let bucket = pattern.truncate(date)?;
        keep.push(bounds.map_or(true, |(lower, upper)| bucket >= lower && bucket <= upper));
        buckets.push(Some(bucket));
    }
    if null_keys > 0 {
        warn!("Dropped {} rows with a missing county or date", null_keys);
    }

    let mut selected: Vec<&str> = vec![COUNTY_COL];
    for reduction in reductions {
        if !selected.contains(&reduction.column.as_str()) {
            selected.push(&reduction.column);
        }
    }
    let mut frame = data.select(selected)?;
    frame.with_column(Series::new(DATE_COL.into(), buckets))?;
    let frame = frame.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
    debug!(
        "Bucketing {} of {} rows with pattern '{}'",
        frame.height(),
        data.height(),
        pattern
    );

    let aggregations: Vec<Expr> = reductions
        .iter()
        .map(|reduction| {
            reduction
                .statistic
                .expr(&reduction.column)
                .alias(reduction.output_name())
        })
        .collect();

    let aggregated = frame
        .lazy()
        .group_by([col(COUNTY_COL), col(DATE_COL)])
        .agg(aggregations)
        .sort([COUNTY_COL, DATE_COL], SortMultipleOptions::default())
        .collect()?;
    debug!("Produced {} buckets", aggregated.height());

    Ok(aggregated)
}

/// Adds a `date_str` column holding each bucket date formatted with `pattern`
/// (e.g. `"2020-01"`), as shown on chart axes.
pub fn add_bucket_labels(
    frame: &mut DataFrame,
    pattern: &BucketPattern,
) -> Result<(), AggregateError> {
    let labels: Vec<Option<String>> = column(frame, DATE_COL)?
        .date()?
        .as_date_iter()
        .map(|date| date.map(|date| pattern.format(date)))
        .collect();
    frame.with_column(Series::new(DATE_STR_COL.into(), labels))?;
    Ok(())
}

fn column<'a>(data: &'a DataFrame, name: &str) -> Result<&'a Column, AggregateError> {
    data.column(name)
        .map_err(|_| AggregateError::MissingColumn(name.to_string()))
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
            | DataType::Null
    )
}

fn validate_input(data: &DataFrame, reductions: &[Reduction]) -> Result<(), AggregateError> {
    let county = column(data, COUNTY_COL)?;
    if county.dtype() != &DataType::String {
        return Err(AggregateError::InvalidColumnType {
            column: COUNTY_COL.to_string(),
            expected: "string",
            found: county.dtype().clone(),
        });
    }

    let date = column(data, DATE_COL)?;
    if !matches!(date.dtype(), DataType::Date | DataType::Datetime(_, _)) {
        return Err(AggregateError::InvalidColumnType {
            column: DATE_COL.to_string(),
            expected: "date or datetime",
            found: date.dtype().clone(),
        });
    }

    let mut output_names = HashSet::from([COUNTY_COL, DATE_COL]);
    for reduction in reductions {
        let values = column(data, &reduction.column)?;
        if !is_numeric(values.dtype()) {
            return Err(AggregateError::InvalidColumnType {
                column: reduction.column.clone(),
                expected: "numeric",
                found: values.dtype().clone(),
            });
        }
        if !output_names.insert(reduction.output_name()) {
            return Err(AggregateError::DuplicateOutputColumn(
                reduction.output_name().to_string(),
            ));
        }
    }

    Ok(())
}

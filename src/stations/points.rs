//! Builds the station points layer: the stations that actually report in the master
//! observation file, with normalised names and coordinates projected to ITM.

use crate::stations::error::StationsError;
use crate::stations::projection::to_irish_transverse_mercator;
use crate::utils::title_case;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::info;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

pub const MASTER_ID_COL: &str = "id";
pub const STATION_ID_COL: &str = "station_id";
pub const NAME_COL: &str = "name";
pub const COUNTY_COL: &str = "county";
pub const LATITUDE_COL: &str = "latitude";
pub const LONGITUDE_COL: &str = "longitude";

/// A weather station positioned on the Irish Transverse Mercator grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPoint {
    pub station_id: String,
    pub name: String,
    pub county: String,
    pub latitude: f64,
    pub longitude: f64,
    pub easting: f64,
    pub northing: f64,
}

/// Keeps the rows of `stations` whose `station_id` occurs as an `id` in `master`,
/// title-cases `name` and `county` and projects `latitude`/`longitude` to ITM.
///
/// Ids are compared by their string form, so an integer `id` in the master file
/// matches the same number in the stations CSV. Row order follows `stations`.
/// Missing coordinates project to NaN.
pub fn prepare_station_points(
    master: &DataFrame,
    stations: &DataFrame,
) -> Result<Vec<StationPoint>, StationsError> {
    let master_ids: HashSet<String> = string_values(master, MASTER_ID_COL)?
        .into_iter()
        .flatten()
        .collect();
    info!("Identified {} master station ids", master_ids.len());

    let ids = string_values(stations, STATION_ID_COL)?;
    let names = string_values(stations, NAME_COL)?;
    let counties = string_values(stations, COUNTY_COL)?;
    let latitudes = float_values(stations, LATITUDE_COL)?;
    let longitudes = float_values(stations, LONGITUDE_COL)?;

    let mut points = Vec::new();
    for (row, id) in ids.into_iter().enumerate() {
        let Some(station_id) = id.filter(|id| master_ids.contains(id)) else {
            continue;
        };
        let latitude = latitudes[row].unwrap_or(f64::NAN);
        let longitude = longitudes[row].unwrap_or(f64::NAN);
        let (easting, northing) = to_irish_transverse_mercator(latitude, longitude);
        points.push(StationPoint {
            station_id,
            name: title_case(names[row].as_deref().unwrap_or_default()),
            county: title_case(counties[row].as_deref().unwrap_or_default()),
            latitude,
            longitude,
            easting,
            northing,
        });
    }
    Ok(points)
}

/// Loads the master observations and station metadata, prepares the station points
/// and, if `output` is given, writes them there as a bincode cache.
///
/// The output file must already exist; a missing target fails before any data is read.
pub fn generate_station_points(
    master_path: &Path,
    stations_csv: &Path,
    output: Option<&Path>,
) -> Result<Vec<StationPoint>, StationsError> {
    if let Some(output) = output {
        if !output.exists() {
            return Err(StationsError::OutputPathMissing(output.to_path_buf()));
        }
    }

    info!("Loading master and stations data from disk ...");
    let master = LazyFrame::scan_parquet(master_path, Default::default())
        .and_then(|frame| frame.select([col(MASTER_ID_COL)]).collect())
        .map_err(|e| StationsError::ParquetScan(master_path.to_path_buf(), e))?;
    let stations = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(stations_csv.to_path_buf()))
        .map_err(|e| StationsError::CsvRead(stations_csv.to_path_buf(), e))?
        .finish()
        .map_err(|e| StationsError::CsvRead(stations_csv.to_path_buf(), e))?;

    let points = prepare_station_points(&master, &stations)?;
    info!(
        "Prepared {} of {} stations",
        points.len(),
        stations.height()
    );

    if let Some(output) = output {
        info!("Writing station points to {} ...", output.display());
        write_station_points(&points, output)?;
    }
    Ok(points)
}

/// Reads a station points cache written by [`generate_station_points`].
pub fn load_station_points(path: &Path) -> Result<Vec<StationPoint>, StationsError> {
    let bytes =
        std::fs::read(path).map_err(|e| StationsError::CacheRead(path.to_path_buf(), e))?;
    let (points, _) =
        bincode::serde::decode_from_slice::<Vec<StationPoint>, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| StationsError::CacheDecode(path.to_path_buf(), Box::from(e)))?;
    Ok(points)
}

fn write_station_points(points: &[StationPoint], path: &Path) -> Result<(), StationsError> {
    let bytes = bincode::serde::encode_to_vec(points, BINCODE_CONFIG)
        .map_err(|e| StationsError::CacheEncode(Box::new(e)))?;
    std::fs::write(path, &bytes).map_err(|e| StationsError::CacheWrite(path.to_path_buf(), e))
}

fn lookup<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column, StationsError> {
    frame
        .column(name)
        .map_err(|_| StationsError::MissingColumn(name.to_string()))
}

/// Column values as strings. Float columns go through `Int64` first so that an id
/// stored as `3904.0` reads as `"3904"`.
fn string_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>, StationsError> {
    let column = lookup(frame, name)?;
    let column = if column.dtype().is_float() {
        column.cast(&DataType::Int64)?
    } else {
        column.clone()
    };
    let strings = column.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|value| value.map(|v| v.trim().to_string()))
        .collect())
}

fn float_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StationsError> {
    let values = lookup(frame, name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

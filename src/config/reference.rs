//! Loads the dashboard reference files (supported columns, statistics, aggregation
//! levels, units, county colours and figure settings) into an immutable structure.

use crate::config::error::ConfigError;
use crate::types::bucket_pattern::BucketPattern;
use crate::types::reduction::Reduction;
use crate::types::statistic::Statistic;
use indexmap::IndexMap;
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const COL_OPTIONS_FILE: &str = "col_options.json";
pub const STAT_OPTIONS_FILE: &str = "stat_options.json";
pub const AGG_LEVEL_STRFTIME_FILE: &str = "agg_level_strftime.json";
pub const MEASUREMENT_UNITS_FILE: &str = "measurement_units.json";
pub const COUNTY_LINE_COLORS_FILE: &str = "county_line_colors.json";
pub const FIG_SETTINGS_FILE: &str = "fig_settings.json";

/// Aggregation level the preaggregated data is stored at.
pub const YEAR_MONTH_LEVEL: &str = "year-month";

/// Size and title of generated charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSettings {
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub title: Option<String>,
}

/// Reference configuration shared by the batch jobs and the chart builder.
///
/// Loaded once with [`ReferenceConfig::load`] and passed by reference to whatever needs
/// it. Map-valued files keep their file order: the first aggregation level is the default
/// one and counties are drawn in the order of `county_line_colors.json`.
#[derive(Debug, Clone)]
pub struct ReferenceConfig {
    /// Measurement columns offered by the dashboard, e.g. `maxtp`, `rain`.
    pub col_options: Vec<String>,
    /// Statistics precomputed by the preaggregation job.
    pub stat_options: Vec<Statistic>,
    /// Aggregation level name (e.g. `year-month`) to truncation pattern.
    pub agg_level_strftime: IndexMap<String, BucketPattern>,
    /// Measurement column to unit label.
    pub measurement_units: IndexMap<String, String>,
    /// County to line colour.
    pub county_line_colors: IndexMap<String, String>,
    pub fig_settings: FigureSettings,
}

impl ReferenceConfig {
    /// Reads every reference file from `ref_dir`.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Read`] / [`ConfigError::Parse`] if a file is missing or malformed,
    ///   including aggregation levels whose pattern is not a valid [`BucketPattern`].
    /// * [`ConfigError::Empty`] if the column, statistic or aggregation level list is empty.
    pub fn load(ref_dir: &Path) -> Result<Self, ConfigError> {
        info!("Loading reference configuration from {}", ref_dir.display());

        let col_options: Vec<String> = read_json(ref_dir, COL_OPTIONS_FILE)?;
        let stat_options: Vec<Statistic> = read_json(ref_dir, STAT_OPTIONS_FILE)?;
        let agg_level_strftime: IndexMap<String, BucketPattern> =
            read_json(ref_dir, AGG_LEVEL_STRFTIME_FILE)?;

        if col_options.is_empty() {
            return Err(ConfigError::Empty(ref_dir.join(COL_OPTIONS_FILE)));
        }
        if stat_options.is_empty() {
            return Err(ConfigError::Empty(ref_dir.join(STAT_OPTIONS_FILE)));
        }
        if agg_level_strftime.is_empty() {
            return Err(ConfigError::Empty(ref_dir.join(AGG_LEVEL_STRFTIME_FILE)));
        }

        Ok(Self {
            col_options,
            stat_options,
            agg_level_strftime,
            measurement_units: read_json(ref_dir, MEASUREMENT_UNITS_FILE)?,
            county_line_colors: read_json(ref_dir, COUNTY_LINE_COLORS_FILE)?,
            fig_settings: read_json(ref_dir, FIG_SETTINGS_FILE)?,
        })
    }

    pub fn bucket_pattern(&self, agg_level: &str) -> Result<&BucketPattern, ConfigError> {
        self.agg_level_strftime
            .get(agg_level)
            .ok_or_else(|| ConfigError::UnknownAggLevel(agg_level.to_string()))
    }

    pub fn default_agg_level(&self) -> &str {
        self.agg_level_strftime
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(YEAR_MONTH_LEVEL)
    }

    pub fn default_column(&self) -> &str {
        self.col_options.first().map(String::as_str).unwrap_or("")
    }

    pub fn default_statistic(&self) -> Statistic {
        self.stat_options.first().copied().unwrap_or(Statistic::Mean)
    }

    pub fn counties(&self) -> Vec<&str> {
        self.county_line_colors.keys().map(String::as_str).collect()
    }

    pub fn unit(&self, column: &str) -> Result<&str, ConfigError> {
        self.measurement_units
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownColumn(column.to_string()))
    }

    /// One reduction per configured column, all with `statistic`.
    pub fn reductions(&self, statistic: Statistic) -> Vec<Reduction> {
        Reduction::for_columns(self.col_options.as_slice(), statistic)
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<T, ConfigError> {
    let path: PathBuf = dir.join(file_name);
    let bytes = std::fs::read(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| ConfigError::Parse(path, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn shipped_config() -> ReferenceConfig {
        let ref_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("ref");
        ReferenceConfig::load(&ref_dir).expect("shipped reference files should load")
    }

    fn write_reference_dir(agg_levels: &str, stats: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let files = [
            (COL_OPTIONS_FILE, r#"["rain", "maxtp"]"#),
            (STAT_OPTIONS_FILE, stats),
            (AGG_LEVEL_STRFTIME_FILE, agg_levels),
            (MEASUREMENT_UNITS_FILE, r#"{"rain": "mm", "maxtp": "°C"}"#),
            (COUNTY_LINE_COLORS_FILE, r##"{"Kerry": "#ff0000", "Cork": "#00ff00"}"##),
            (FIG_SETTINGS_FILE, r#"{"height": 400, "width": 800}"#),
        ];
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_shipped_reference_files() {
        let config = shipped_config();

        assert_eq!(config.default_column(), "maxtp");
        assert_eq!(config.default_statistic(), Statistic::Mean);
        assert_eq!(config.default_agg_level(), "year");
        assert_eq!(config.bucket_pattern(YEAR_MONTH_LEVEL).unwrap().as_str(), "%Y-%m");
        assert_eq!(config.counties().len(), 26);
        assert_eq!(config.unit("rain").unwrap(), "mm");
        for column in &config.col_options {
            assert!(config.unit(column).is_ok(), "no unit for {}", column);
        }
    }

    #[test]
    fn test_map_order_is_preserved() {
        let dir = write_reference_dir(r#"{"month": "%m", "year": "%Y"}"#, r#"["max"]"#);
        let config = ReferenceConfig::load(dir.path()).unwrap();

        assert_eq!(config.default_agg_level(), "month");
        assert_eq!(config.counties(), vec!["Kerry", "Cork"]);
        assert_eq!(config.fig_settings.title, None);
        assert_eq!(
            config.reductions(Statistic::Max),
            vec![
                Reduction::new("rain", Statistic::Max),
                Reduction::new("maxtp", Statistic::Max)
            ]
        );
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let dir = write_reference_dir(r#"{"hour": "%H"}"#, r#"["mean"]"#);
        assert!(matches!(
            ReferenceConfig::load(dir.path()),
            Err(ConfigError::Parse(path, _)) if path.ends_with(AGG_LEVEL_STRFTIME_FILE)
        ));
    }

    #[test]
    fn test_unknown_statistic_is_rejected() {
        let dir = write_reference_dir(r#"{"year": "%Y"}"#, r#"["mean", "std"]"#);
        assert!(matches!(
            ReferenceConfig::load(dir.path()),
            Err(ConfigError::Parse(path, _)) if path.ends_with(STAT_OPTIONS_FILE)
        ));
    }

    #[test]
    fn test_empty_lists_are_rejected() {
        let dir = write_reference_dir(r#"{"year": "%Y"}"#, "[]");
        assert!(matches!(
            ReferenceConfig::load(dir.path()),
            Err(ConfigError::Empty(path)) if path.ends_with(STAT_OPTIONS_FILE)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ReferenceConfig::load(dir.path()),
            Err(ConfigError::Read(path, _)) if path.ends_with(COL_OPTIONS_FILE)
        ));
    }

    #[test]
    fn test_unknown_lookups() {
        let config = shipped_config();
        assert!(matches!(
            config.bucket_pattern("decade"),
            Err(ConfigError::UnknownAggLevel(level)) if level == "decade"
        ));
        assert!(matches!(
            config.unit("humidity"),
            Err(ConfigError::UnknownColumn(column)) if column == "humidity"
        ));
    }
}

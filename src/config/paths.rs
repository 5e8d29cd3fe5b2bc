use std::path::{Path, PathBuf};

const DATA_DIR: &str = "data";
const GIS_DIR: &str = "gis";
const REF_DIR: &str = "ref";
const MASTER_DATA_FILE: &str = "master.parquet";
const PREAGGREGATE_DATA_FILE: &str = "preaggregate_data.parquet";
const STATIONS_FILE: &str = "stations.csv";
const POINTS_DATA_FILE: &str = "points_data.bin";

/// File layout of a dashboard project rooted at one directory.
///
/// ```text
/// <root>/
///   ref/                          reference JSON files
///   data/master.parquet           daily station observations
///   data/preaggregate_data.parquet
///   data/stations.csv             station metadata
///   data/gis/points_data.bin      projected station points
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub reference_dir: PathBuf,
    pub master_data: PathBuf,
    pub preaggregate_data: PathBuf,
    pub stations: PathBuf,
    pub points_data: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let data_dir = root.join(DATA_DIR);
        Self {
            reference_dir: root.join(REF_DIR),
            master_data: data_dir.join(MASTER_DATA_FILE),
            preaggregate_data: data_dir.join(PREAGGREGATE_DATA_FILE),
            stations: data_dir.join(STATIONS_FILE),
            points_data: data_dir.join(GIS_DIR).join(POINTS_DATA_FILE),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = DataPaths::new("/srv/climate");
        assert_eq!(paths.reference_dir, Path::new("/srv/climate/ref"));
        assert_eq!(paths.master_data, Path::new("/srv/climate/data/master.parquet"));
        assert_eq!(
            paths.preaggregate_data,
            Path::new("/srv/climate/data/preaggregate_data.parquet")
        );
        assert_eq!(paths.points_data, Path::new("/srv/climate/data/gis/points_data.bin"));
    }
}

use std::path::{Path, PathBuf};

const BASE_DIR: &str =
    "/Users/kohanchen/Documents/Fall 2024/data315-au24/demos/animation-activity/start/public";
const OUTPUT_DIR: &str =
    "/Users/kohanchen/Documents/Fall 2024/data315-au24/demos/animation-activity/start/public";

/// One shapefile to convert and the GeoJSON file it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Human readable name used in progress messages.
    pub name: String,
    /// Path of the `.shp` file, relative to [`Config::base_dir`].
    pub input: PathBuf,
    /// File name written inside [`Config::output_dir`].
    pub output_file: String,
}

impl DatasetSpec {
    pub fn new(name: &str, input: impl Into<PathBuf>, output_file: &str) -> Self {
        DatasetSpec {
            name: name.to_string(),
            input: input.into(),
            output_file: output_file.to_string(),
        }
    }

    pub fn states() -> Self {
        DatasetSpec::new(
            "states",
            "cb_2018_us_state_500k/cb_2018_us_state_500k.shp",
            "us-states.json",
        )
    }

    pub fn districts() -> Self {
        DatasetSpec::new(
            "districts",
            "US Attorney Districts Shapefile simplified_20241109/geo_export_d2278870-82b8-41a4-820b-fad368168f29.shp",
            "us-districts.json",
        )
    }
}

/// Where to read shapefiles from, where to write GeoJSON to, and which datasets to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetSpec>,
}

impl Config {
    /// States then districts, read from `base_dir` and written to `output_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Config {
            base_dir: base_dir.into(),
            output_dir: output_dir.into(),
            datasets: vec![DatasetSpec::states(), DatasetSpec::districts()],
        }
    }

    pub fn input_path(&self, dataset: &DatasetSpec) -> PathBuf {
        self.base_dir.join(&dataset.input)
    }

    pub fn output_path(&self, dataset: &DatasetSpec) -> PathBuf {
        self.output_dir.join(&dataset.output_file)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(BASE_DIR, OUTPUT_DIR)
    }
}

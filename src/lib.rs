//! Convert shapefile datasets into GeoJSON `FeatureCollection` files.

pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geometry;
pub mod output;
pub mod reader;

pub use config::{Config, DatasetSpec};
pub use convert::{convert_dataset, run, ConversionSummary, DatasetOutcome, DatasetReport, RunReport};
pub use dataset::{ShapeDataset, ShapeRecord};
pub use error::{ConvertError, Result};
pub use export::{read_feature_collection, to_feature_collection, to_geojson_string};
pub use reader::read_shapefile;

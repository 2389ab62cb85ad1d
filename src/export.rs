use std::io::BufReader;
use std::path::Path;

use fs_err::File;
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson};
use tracing::warn;

use crate::dataset::ShapeDataset;
use crate::error::{ConvertError, Result};

/// Build a `FeatureCollection` with one feature per record, `id` set to the record index.
pub fn to_feature_collection(dataset: ShapeDataset) -> FeatureCollection {
    let features = dataset
        .records
        .into_iter()
        .enumerate()
        .map(|(i, record)| Feature {
            bbox: None,
            geometry: record.geometry,
            id: Some(Id::String(i.to_string())),
            properties: Some(record.properties),
            foreign_members: None,
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serialize a dataset to GeoJSON text.
///
/// Coordinates are written untouched. GeoJSON readers assume WGS84
/// longitude/latitude, so a warning is logged when the data is clearly not in degrees.
pub fn to_geojson_string(dataset: ShapeDataset) -> Result<String> {
    if !dataset.is_geographic() {
        warn!(
            "Coordinates fall outside longitude/latitude range, GeoJSON output is not reprojected"
        );
    }
    let gj = GeoJson::FeatureCollection(to_feature_collection(dataset));
    Ok(serde_json::to_string(&gj)?)
}

pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let gj: GeoJson = serde_json::from_reader(reader)?;
    match gj {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(ConvertError::NotFeatureCollection(path.to_path_buf())),
    }
}

use std::path::PathBuf;

use shapefile::ShapeType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("shapefile not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("missing shapefile sibling: {}", .0.display())]
    MissingSibling(PathBuf),

    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("dbase error: {0}")]
    Dbase(#[from] dbase::Error),

    #[error("unsupported shape type: {0}")]
    UnsupportedShape(ShapeType),

    #[error("expected a GeoJSON FeatureCollection in {}", .0.display())]
    NotFeatureCollection(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

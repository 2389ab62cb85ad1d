use geo::{coord, Coord, Rect};
use geojson::{Geometry, JsonObject, Position, Value};
use shapefile::ShapeType;

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    /// `None` for null shapes.
    pub geometry: Option<Geometry>,
    /// Attribute values keyed by column name, in `.dbf` column order.
    pub properties: JsonObject,
}

/// Every record of one shapefile, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDataset {
    pub shape_type: ShapeType,
    pub fields: Vec<String>,
    /// WKT from the `.prj` sibling, if there was one.
    pub crs: Option<String>,
    pub records: Vec<ShapeRecord>,
}

impl ShapeDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bounding rectangle of every coordinate in the dataset.
    pub fn extent(&self) -> Option<Rect<f64>> {
        let mut extent = None;
        for geometry in self.records.iter().filter_map(|r| r.geometry.as_ref()) {
            extend_extent(&mut extent, &geometry.value);
        }
        extent
    }

    /// True when the coordinates fit in longitude/latitude degrees.
    /// An empty dataset counts as geographic.
    pub fn is_geographic(&self) -> bool {
        match self.extent() {
            Some(rect) => {
                rect.min().x >= -180.0
                    && rect.max().x <= 180.0
                    && rect.min().y >= -90.0
                    && rect.max().y <= 90.0
            }
            None => true,
        }
    }
}

fn extend_extent(extent: &mut Option<Rect<f64>>, value: &Value) {
    match value {
        Value::Point(p) => extend_with(extent, p),
        Value::MultiPoint(points) | Value::LineString(points) => {
            points.iter().for_each(|p| extend_with(extent, p))
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter()
            .flatten()
            .for_each(|p| extend_with(extent, p)),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flatten()
            .for_each(|p| extend_with(extent, p)),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .for_each(|g| extend_extent(extent, &g.value)),
    }
}

fn extend_with(extent: &mut Option<Rect<f64>>, position: &Position) {
    let c: Coord<f64> = coord! { x: position[0], y: position[1] };
    *extent = Some(match *extent {
        Some(rect) => Rect::new(
            coord! { x: rect.min().x.min(c.x), y: rect.min().y.min(c.y) },
            coord! { x: rect.max().x.max(c.x), y: rect.max().y.max(c.y) },
        ),
        None => Rect::new(c, c),
    });
}

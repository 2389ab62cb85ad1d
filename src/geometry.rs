use geo::{coord, Contains, LineString};
use geojson::{Geometry, PolygonType, Position, Value};
use shapefile::{Point, PointM, PointZ, PolygonRing, Shape};

use crate::error::{ConvertError, Result};

trait ToPosition {
    fn to_position(&self) -> Position;
}

impl ToPosition for Point {
    fn to_position(&self) -> Position {
        vec![self.x, self.y]
    }
}

// M is a measure, not a coordinate
impl ToPosition for PointM {
    fn to_position(&self) -> Position {
        vec![self.x, self.y]
    }
}

impl ToPosition for PointZ {
    fn to_position(&self) -> Position {
        vec![self.x, self.y, self.z]
    }
}

/// Convert a shapefile shape into a GeoJSON geometry.
///
/// Null shapes become `None`. Polylines and polygons with a single part
/// collapse to `LineString` and `Polygon`, otherwise the multi-part type is used.
pub fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry>> {
    let value = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Value::Point(p.to_position()),
        Shape::PointM(p) => Value::Point(p.to_position()),
        Shape::PointZ(p) => Value::Point(p.to_position()),
        Shape::Multipoint(mp) => Value::MultiPoint(positions(mp.points())),
        Shape::MultipointM(mp) => Value::MultiPoint(positions(mp.points())),
        Shape::MultipointZ(mp) => Value::MultiPoint(positions(mp.points())),
        Shape::Polyline(line) => line_value(line.parts()),
        Shape::PolylineM(line) => line_value(line.parts()),
        Shape::PolylineZ(line) => line_value(line.parts()),
        Shape::Polygon(polygon) => polygon_value(polygon.rings()),
        Shape::PolygonM(polygon) => polygon_value(polygon.rings()),
        Shape::PolygonZ(polygon) => polygon_value(polygon.rings()),
        other => return Err(ConvertError::UnsupportedShape(other.shapetype())),
    };
    Ok(Some(Geometry::new(value)))
}

fn positions<P: ToPosition>(points: &[P]) -> Vec<Position> {
    points.iter().map(ToPosition::to_position).collect()
}

fn line_value<P: ToPosition>(parts: &[Vec<P>]) -> Value {
    let mut lines: Vec<Vec<Position>> = parts.iter().map(|part| positions(part)).collect();
    if lines.len() == 1 {
        Value::LineString(lines.remove(0))
    } else {
        Value::MultiLineString(lines)
    }
}

fn polygon_value<P: ToPosition>(rings: &[PolygonRing<P>]) -> Value {
    let mut polygons: Vec<PolygonType> = Vec::new();
    let mut outlines: Vec<geo::Polygon<f64>> = Vec::new();
    // each hole with the index of the outer ring listed before it
    let mut holes: Vec<(Vec<Position>, Option<usize>)> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                let ring = positions(points);
                outlines.push(outline(&ring));
                polygons.push(vec![ring]);
            }
            PolygonRing::Inner(points) => {
                holes.push((positions(points), polygons.len().checked_sub(1)))
            }
        }
    }
    for (hole, preceding) in holes {
        let container = hole.first().and_then(|p| {
            let c = coord! { x: p[0], y: p[1] };
            outlines.iter().position(|outline| outline.contains(&c))
        });
        match container.or(preceding) {
            Some(i) => polygons[i].push(hole),
            // hole with no outer ring to belong to
            None => polygons.push(vec![hole]),
        }
    }
    if polygons.len() == 1 {
        Value::Polygon(polygons.remove(0))
    } else {
        Value::MultiPolygon(polygons)
    }
}

fn outline(ring: &[Position]) -> geo::Polygon<f64> {
    let exterior: LineString<f64> = ring.iter().map(|p| coord! { x: p[0], y: p[1] }).collect();
    geo::Polygon::new(exterior, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{
        Multipatch, Multipoint, MultipointM, MultipointZ, Patch, Polygon, PolygonZ, Polyline,
        PolylineM, PolylineZ, ShapeType,
    };

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x, y + size),
            Point::new(x + size, y + size),
            Point::new(x + size, y),
            Point::new(x, y),
        ]
    }

    fn value_of(shape: Shape) -> Value {
        shape_to_geometry(shape).unwrap().unwrap().value
    }

    #[test]
    fn null_shape_has_no_geometry() {
        assert!(shape_to_geometry(Shape::NullShape).unwrap().is_none());
    }

    #[test]
    fn point_z_keeps_elevation() {
        let value = value_of(Shape::PointZ(PointZ::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(value, Value::Point(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn point_m_drops_measure() {
        let value = value_of(Shape::PointM(PointM::new(1.0, 2.0, 9.0)));
        assert_eq!(value, Value::Point(vec![1.0, 2.0]));
    }

    #[test]
    fn multipoint() {
        let mp = Multipoint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(
            value_of(Shape::Multipoint(mp)),
            Value::MultiPoint(vec![vec![0.0, 0.0], vec![1.0, 1.0]])
        );
    }

    #[test]
    fn single_part_polyline_is_line_string() {
        let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 1.0)]);
        assert_eq!(
            value_of(Shape::Polyline(line)),
            Value::LineString(vec![vec![0.0, 0.0], vec![2.0, 1.0]])
        );
    }

    #[test]
    fn multi_part_polyline_is_multi_line_string() {
        let line = Polyline::with_parts(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)],
        ]);
        match value_of(Shape::Polyline(line)) {
            Value::MultiLineString(lines) => assert_eq!(lines.len(), 2),
            other => panic!("expected MultiLineString, got {:?}", other),
        }
    }

    #[test]
    fn polygon_with_hole() {
        let polygon = Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0)),
        ]);
        match value_of(Shape::Polygon(polygon)) {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn holes_stay_with_their_outer_ring() {
        let polygon = Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Outer(square(20.0, 0.0, 10.0)),
            PolygonRing::Inner(square(22.0, 2.0, 2.0)),
        ]);
        match value_of(Shape::Polygon(polygon)) {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 1);
                assert_eq!(polygons[1].len(), 2);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn leading_hole_becomes_its_own_polygon() {
        let rings = vec![PolygonRing::Inner(square(0.0, 0.0, 1.0))];
        match polygon_value(&rings) {
            Value::Polygon(rings) => assert_eq!(rings.len(), 1),
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn hole_goes_to_the_outer_ring_containing_it() {
        let polygon = Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Outer(square(20.0, 0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0)),
        ]);
        match value_of(Shape::Polygon(polygon)) {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons[0].len(), 2);
                assert_eq!(polygons[1].len(), 1);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn uncontained_hole_falls_back_to_preceding_outer_ring() {
        let rings = vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Outer(square(20.0, 0.0, 10.0)),
            PolygonRing::Inner(square(50.0, 50.0, 1.0)),
        ];
        match polygon_value(&rings) {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons[0].len(), 1);
                assert_eq!(polygons[1].len(), 2);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn multipatch_is_unsupported() {
        let patch = Multipatch::new(Patch::TriangleStrip(vec![
            PointZ::new(0.0, 0.0, 0.0, 0.0),
            PointZ::new(1.0, 0.0, 0.0, 0.0),
            PointZ::new(0.0, 1.0, 0.0, 0.0),
        ]));
        match shape_to_geometry(Shape::Multipatch(patch)) {
            Err(ConvertError::UnsupportedShape(shape_type)) => {
                assert_eq!(shape_type, ShapeType::Multipatch)
            }
            other => panic!("expected UnsupportedShape, got {:?}", other),
        }
    }

    #[test]
    fn polygon_z_with_hole_keeps_elevation() {
        let z = |points: Vec<Point>, height: f64| -> Vec<PointZ> {
            points
                .into_iter()
                .map(|p| PointZ::new(p.x, p.y, height, 0.0))
                .collect()
        };
        let polygon = PolygonZ::with_rings(vec![
            PolygonRing::Outer(z(square(0.0, 0.0, 10.0), 100.0)),
            PolygonRing::Inner(z(square(2.0, 2.0, 2.0), 50.0)),
        ]);
        match value_of(Shape::PolygonZ(polygon)) {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                assert!(rings[0].iter().all(|p| p.len() == 3 && p[2] == 100.0));
                assert!(rings[1].iter().all(|p| p.len() == 3 && p[2] == 50.0));
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn polyline_z_and_multipoint_z_keep_elevation() {
        let line = PolylineZ::new(vec![
            PointZ::new(0.0, 0.0, 5.0, 0.0),
            PointZ::new(1.0, 1.0, 6.0, 0.0),
        ]);
        assert_eq!(
            value_of(Shape::PolylineZ(line)),
            Value::LineString(vec![vec![0.0, 0.0, 5.0], vec![1.0, 1.0, 6.0]])
        );

        let points = MultipointZ::new(vec![PointZ::new(3.0, 4.0, 7.0, 1.0)]);
        assert_eq!(
            value_of(Shape::MultipointZ(points)),
            Value::MultiPoint(vec![vec![3.0, 4.0, 7.0]])
        );
    }

    #[test]
    fn measured_multi_part_shapes_drop_m() {
        let line = PolylineM::with_parts(vec![
            vec![PointM::new(0.0, 0.0, 1.0), PointM::new(1.0, 0.0, 2.0)],
            vec![PointM::new(5.0, 5.0, 3.0), PointM::new(6.0, 5.0, 4.0)],
        ]);
        assert_eq!(
            value_of(Shape::PolylineM(line)),
            Value::MultiLineString(vec![
                vec![vec![0.0, 0.0], vec![1.0, 0.0]],
                vec![vec![5.0, 5.0], vec![6.0, 5.0]],
            ])
        );

        let points = MultipointM::new(vec![
            PointM::new(1.0, 2.0, 9.0),
            PointM::new(3.0, 4.0, 9.0),
        ]);
        assert_eq!(
            value_of(Shape::MultipointM(points)),
            Value::MultiPoint(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        );
    }
}

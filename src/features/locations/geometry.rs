//! GeoJSON decoding for stored locations.
//!
//! Locations arrive as either a GeoJSON `Feature` or a bare geometry object.
//! Only the geometry takes part in spatial predicates, so this module extracts
//! it and turns it into a [`geo::Geometry`] that planar predicates can run on.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon, Validation,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("GeoJSON object must have a string \"type\" member")]
    MissingType,

    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Unsupported GeoJSON type: {0}")]
    UnsupportedType(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

type GeometryResult<T> = std::result::Result<T, GeometryError>;

/// Return the geometry member of a Feature, or the object itself when it is
/// already a geometry.
pub fn geometry_object(geojson: &Value) -> GeometryResult<&Value> {
    let kind = type_of(geojson)?;
    if kind != "Feature" {
        return Ok(geojson);
    }

    match geojson.get("geometry") {
        Some(geometry) if geometry.is_object() => Ok(geometry),
        _ => Err(GeometryError::MissingGeometry),
    }
}

/// Decode a Feature or geometry into a planar geometry.
///
/// The result is valid in the OGC simple-features sense: no self-intersecting
/// or zero-area rings, and every position within lon [-180, 180] and
/// lat [-90, 90].
pub fn parse_geometry(geojson: &Value) -> GeometryResult<Geometry<f64>> {
    let geometry = decode_geometry(geometry_object(geojson)?)?;
    geometry
        .check_validation()
        .map_err(|e| GeometryError::InvalidGeometry(e.to_string()))?;
    Ok(geometry)
}

fn type_of(value: &Value) -> GeometryResult<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(GeometryError::MissingType)
}

fn decode_geometry(geometry: &Value) -> GeometryResult<Geometry<f64>> {
    let kind = type_of(geometry)?;

    if kind == "GeometryCollection" {
        let members = geometry
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                GeometryError::InvalidCoordinates(
                    "GeometryCollection requires a \"geometries\" array".to_string(),
                )
            })?;
        let geometries = members
            .iter()
            .map(decode_geometry)
            .collect::<GeometryResult<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geometries)));
    }

    let coordinates = geometry
        .get("coordinates")
        .ok_or_else(|| GeometryError::InvalidCoordinates(format!("{} has no coordinates", kind)))?;

    let decoded = match kind {
        "Point" => Geometry::Point(Point::from(position(coordinates)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint::new(
            array(coordinates, "MultiPoint")?
                .iter()
                .map(|p| position(p).map(Point::from))
                .collect::<GeometryResult<Vec<_>>>()?,
        )),
        "LineString" => Geometry::LineString(line_string(coordinates)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString::new(
            array(coordinates, "MultiLineString")?
                .iter()
                .map(line_string)
                .collect::<GeometryResult<Vec<_>>>()?,
        )),
        "Polygon" => Geometry::Polygon(polygon(coordinates)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon::new(
            array(coordinates, "MultiPolygon")?
                .iter()
                .map(polygon)
                .collect::<GeometryResult<Vec<_>>>()?,
        )),
        other => return Err(GeometryError::UnsupportedType(other.to_string())),
    };

    Ok(decoded)
}

fn array<'a>(value: &'a Value, what: &str) -> GeometryResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| GeometryError::InvalidCoordinates(format!("{} must be an array", what)))
}

/// `[lon, lat]` or `[lon, lat, alt]`; altitude is dropped
fn position(value: &Value) -> GeometryResult<Coord<f64>> {
    let parts = array(value, "position")?;
    if parts.len() < 2 {
        return Err(GeometryError::InvalidCoordinates(
            "position needs at least two numbers".to_string(),
        ));
    }

    let number = |v: &Value| {
        v.as_f64().filter(|n| n.is_finite()).ok_or_else(|| {
            GeometryError::InvalidCoordinates(format!("{} is not a finite number", v))
        })
    };

    let (lon, lat) = (number(&parts[0])?, number(&parts[1])?);
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(GeometryError::InvalidCoordinates(format!(
            "[{}, {}] is outside longitude/latitude range",
            lon, lat
        )));
    }

    Ok(Coord { x: lon, y: lat })
}

fn line_string(value: &Value) -> GeometryResult<LineString<f64>> {
    let coords = array(value, "LineString")?
        .iter()
        .map(position)
        .collect::<GeometryResult<Vec<_>>>()?;
    if coords.len() < 2 {
        return Err(GeometryError::InvalidCoordinates(
            "LineString needs at least two positions".to_string(),
        ));
    }
    Ok(LineString::new(coords))
}

fn linear_ring(value: &Value) -> GeometryResult<LineString<f64>> {
    let ring = line_string(value)?;
    if ring.0.len() < 4 || ring.0.first() != ring.0.last() {
        return Err(GeometryError::InvalidCoordinates(
            "polygon rings must be closed and have at least four positions".to_string(),
        ));
    }
    Ok(ring)
}

fn polygon(value: &Value) -> GeometryResult<Polygon<f64>> {
    let mut rings = array(value, "Polygon")?
        .iter()
        .map(linear_ring)
        .collect::<GeometryResult<Vec<_>>>()?;
    if rings.is_empty() {
        return Err(GeometryError::InvalidCoordinates(
            "Polygon needs an exterior ring".to_string(),
        ));
    }
    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_geometry_is_extracted() {
        let feature = json!({
            "type": "Feature",
            "properties": { "name": "tip" },
            "geometry": { "type": "Point", "coordinates": [151.0, -34.0] }
        });

        let geometry = parse_geometry(&feature).unwrap();
        assert_eq!(geometry, Geometry::Point(Point::new(151.0, -34.0)));
    }

    #[test]
    fn test_bare_polygon_with_hole() {
        let polygon = json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                [[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 2.0]]
            ]
        });

        match parse_geometry(&polygon).unwrap() {
            Geometry::Polygon(p) => assert_eq!(p.interiors().len(), 1),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_feature_without_geometry() {
        let feature = json!({ "type": "Feature", "geometry": null, "properties": {} });
        assert_eq!(
            parse_geometry(&feature),
            Err(GeometryError::MissingGeometry)
        );
    }

    #[test]
    fn test_feature_collection_is_unsupported() {
        let collection = json!({ "type": "FeatureCollection", "features": [] });
        assert_eq!(
            parse_geometry(&collection),
            Err(GeometryError::UnsupportedType("FeatureCollection".to_string()))
        );
    }

    #[test]
    fn test_open_ring_is_rejected() {
        let polygon = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
        });
        assert!(matches!(
            parse_geometry(&polygon),
            Err(GeometryError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_non_numeric_position_is_rejected() {
        let point = json!({ "type": "Point", "coordinates": ["151", -34.0] });
        assert!(matches!(
            parse_geometry(&point),
            Err(GeometryError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(
            parse_geometry(&json!({ "coordinates": [1.0, 2.0] })),
            Err(GeometryError::MissingType)
        );
        assert_eq!(parse_geometry(&json!("Point")), Err(GeometryError::MissingType));
    }

    #[test]
    fn test_geometry_collection() {
        let collection = json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Point", "coordinates": [1.0, 2.0] },
                { "type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]] }
            ]
        });
        match parse_geometry(&collection).unwrap() {
            Geometry::GeometryCollection(gc) => assert_eq!(gc.0.len(), 2),
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_altitude_is_dropped() {
        let point = json!({ "type": "Point", "coordinates": [151.0, -34.0, 10.0] });
        assert_eq!(
            parse_geometry(&point).unwrap(),
            Geometry::Point(Point::new(151.0, -34.0))
        );
    }

    #[test]
    fn test_out_of_range_position_is_rejected() {
        for coordinates in [json!([181.0, 0.0]), json!([-180.5, 0.0]), json!([0.0, 90.1])] {
            let point = json!({ "type": "Point", "coordinates": coordinates });
            assert!(matches!(
                parse_geometry(&point),
                Err(GeometryError::InvalidCoordinates(_))
            ));
        }

        let edge = json!({ "type": "Point", "coordinates": [180.0, -90.0] });
        assert!(parse_geometry(&edge).is_ok());
    }

    #[test]
    fn test_bowtie_polygon_is_rejected() {
        let bowtie = json!({
            "type": "Polygon",
            "coordinates": [[[150.0, -35.0], [152.0, -33.0], [152.0, -35.0], [150.0, -33.0], [150.0, -35.0]]]
        });
        assert!(matches!(
            parse_geometry(&bowtie),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_zero_area_ring_is_rejected() {
        let collapsed = json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[151.0, -34.0], [151.0, -34.0], [151.0, -34.0], [151.0, -34.0]]]
            }
        });
        assert!(matches!(
            parse_geometry(&collapsed),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }
}

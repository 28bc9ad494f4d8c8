use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Map viewport in degrees, as reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Decode a JSON-encoded `{north, south, east, west}` object.
    ///
    /// Values are passed through untouched: no clamping and no reordering of
    /// west/east or south/north.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "bounds parameter is required".to_string())?;

        let bounds: Bounds =
            serde_json::from_str(raw).map_err(|e| format!("bounds is not valid: {}", e))?;

        if !bounds.is_finite() {
            return Err("bounds must contain finite numbers".to_string());
        }

        Ok(bounds)
    }

    fn is_finite(&self) -> bool {
        [self.north, self.south, self.east, self.west]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Closed rectangular ring built from a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct SearchArea {
    ring: [Coord<f64>; 5],
}

impl SearchArea {
    /// Vertices in query order, x = longitude, y = latitude
    pub fn ring(&self) -> &[Coord<f64>; 5] {
        &self.ring
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::new(self.ring.to_vec()), vec![])
    }

    /// GeoJSON Polygon suitable for a spatial query
    pub fn to_geojson(&self) -> serde_json::Value {
        let coordinates: Vec<[f64; 2]> = self.ring().iter().map(|c| [c.x, c.y]).collect();
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [coordinates],
        })
    }
}

impl From<Bounds> for SearchArea {
    fn from(b: Bounds) -> Self {
        let corner = |x: f64, y: f64| Coord { x, y };
        Self {
            ring: [
                corner(b.west, b.south),
                corner(b.west, b.north),
                corner(b.east, b.north),
                corner(b.east, b.south),
                corner(b.west, b.south),
            ],
        }
    }
}

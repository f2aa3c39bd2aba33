//! GeoJSON geometry objects (RFC 7946 section 3.1).
//!
//! Coordinates are kept as plain position vectors; the orchestration layer only passes
//! geometries through, so no topology checks are performed beyond the shape of the JSON.

use serde::{Deserialize, Serialize};

/// A single position: `[longitude, latitude]` with an optional altitude.
pub type Position = Vec<f64>;

/// A GeoJSON geometry, tagged by its `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    #[must_use]
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self::Point {
            coordinates: vec![longitude, latitude],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn point_wire_form() {
        let value = serde_json::to_value(Geometry::point(0.0, 0.0)).unwrap();
        assert_eq!(value, json!({"type": "Point", "coordinates": [0.0, 0.0]}));
    }

    #[test]
    fn polygon_parses() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
        }))
        .unwrap();
        assert!(matches!(geometry, Geometry::Polygon { ref coordinates } if coordinates[0].len() == 4));
    }

    #[test]
    fn unknown_type_rejected() {
        let err = serde_json::from_value::<Geometry>(json!({"type": "Circle", "radius": 3}));
        assert!(err.is_err());
    }
}

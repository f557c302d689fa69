//! GeoJSON export of footprints and ground tracks.
//!
//! Geometries serialize to RFC 7946 JSON through serde. Coordinates
//! are stored east-positive in `[-180°, 180°]`, converted from the
//! west longitudes used everywhere else in the crate.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::vectors::deg180;

/// Convert a west longitude to an east longitude in `[-180°, 180°]`.
pub fn lon_e(lon_w: f64) -> f64 {
    deg180(-lon_w)
}

/// A GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Point from a (west longitude, latitude) pair.
    pub fn point(lon_w: f64, lat: f64) -> Geometry {
        Geometry::Point {
            coordinates: [lon_e(lon_w), lat],
        }
    }

    /// Line string from (west longitude, latitude) pairs.
    pub fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString {
            coordinates: points.iter().map(|&(lon, lat)| [lon_e(lon), lat]).collect(),
        }
    }

    /// Polygon from an exterior ring of (west longitude, latitude)
    /// pairs. The ring is closed if needed.
    pub fn polygon(ring: &[(f64, f64)]) -> Geometry {
        Geometry::Polygon {
            coordinates: vec![closed_ring(ring)],
        }
    }

    /// Multi-polygon from a list of exterior rings (one per piece, for
    /// footprints split by the anti-meridian).
    pub fn multi_polygon(rings: &[Vec<(f64, f64)>]) -> Geometry {
        Geometry::MultiPolygon {
            coordinates: rings.iter().map(|r| vec![closed_ring(r)]).collect(),
        }
    }
}

fn closed_ring(ring: &[(f64, f64)]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = ring.iter().map(|&(lon, lat)| [lon_e(lon), lat]).collect();
    if out.first() != out.last() {
        if let Some(&first) = out.first() {
            out.push(first);
        }
    }
    out
}

/// A GeoJSON feature: a geometry plus free-form properties.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: Geometry,
    pub properties: Map<String, Json>,
}

impl Feature {
    /// Feature wrapping a geometry, with no properties.
    pub fn new(geometry: Geometry) -> Feature {
        Feature {
            kind: "Feature",
            geometry,
            properties: Map::new(),
        }
    }

    /// Attach a property (builder style).
    pub fn with(mut self, key: &str, value: impl Into<Json>) -> Feature {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Collection from a list of features.
    pub fn new(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            kind: "FeatureCollection",
            features,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("GeoJSON serialization cannot fail")
    }
}

impl Default for FeatureCollection {
    fn default() -> FeatureCollection {
        FeatureCollection::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn east_longitudes() {
        assert_eq!(lon_e(0.0), 0.0);
        assert_eq!(lon_e(90.0), -90.0);
        assert_eq!(lon_e(270.0), 90.0);
        assert_eq!(lon_e(180.0), -180.0);
    }

    #[test]
    fn point_json() {
        let geometry = Geometry::point(90.0, 10.0);
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Point", "coordinates": [-90.0, 10.0]})
        );
    }

    #[test]
    fn polygon_closes_ring() {
        let geometry = Geometry::polygon(&[(10.0, 0.0), (350.0, 0.0), (0.0, 10.0)]);
        match &geometry {
            Geometry::Polygon { coordinates } => {
                let ring = &coordinates[0];
                assert_eq!(ring.len(), 4);
                assert_eq!(ring[0], [-10.0, 0.0]);
                assert_eq!(ring[1], [10.0, 0.0]);
                assert_eq!(ring[0], ring[3]);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn feature_collection_json() {
        let feature = Feature::new(Geometry::point(0.0, 0.0))
            .with("flyby", "T3")
            .with("alt_km", 1579);
        let collection = FeatureCollection::new(vec![feature]);
        let json: Json = serde_json::from_str(&collection.to_json()).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["properties"]["flyby"], "T3");
        assert_eq!(json["features"][0]["properties"]["alt_km"], 1579);
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
    }
}

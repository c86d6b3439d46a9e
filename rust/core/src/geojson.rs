// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON boundary sources.
//!
//! The catchment boundary arrives as one feature inside a GeoJSON
//! FeatureCollection, selected by matching a property against a target
//! value. Only the selected feature's geometry is interpreted, so unrelated
//! features of any geometry type may share the file.

use std::path::Path;

use nalgebra::Point2;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::polygon::Polygon2D;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    pub geometry: Value,
}

/// The boundary polygon resolved from a feature collection, together with
/// how many features matched the selector.
#[derive(Debug)]
pub struct BoundarySelection {
    pub polygon: Polygon2D,
    /// Number of features that matched; > 1 means the tie-break (first in
    /// file order) was applied.
    pub matches: usize,
}

/// A loaded GeoJSON vector collection.
#[derive(Debug)]
pub struct BoundarySource {
    collection: FeatureCollection,
}

impl BoundarySource {
    pub fn from_str(content: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(content)?;
        Ok(Self { collection })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// Select the boundary polygon whose `attribute` property equals `value`.
    ///
    /// Zero matches is an error. Multiple matches resolve to the first
    /// feature in file order; the caller can inspect
    /// [`BoundarySelection::matches`] to flag the ambiguity.
    pub fn select(&self, attribute: &str, value: &Value) -> Result<BoundarySelection> {
        let matching: Vec<&Feature> = self
            .collection
            .features
            .iter()
            .filter(|f| {
                f.properties
                    .get(attribute)
                    .is_some_and(|v| values_match(v, value))
            })
            .collect();

        let first = matching.first().ok_or_else(|| Error::BoundaryNotFound {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })?;

        Ok(BoundarySelection {
            polygon: polygon_from_geojson(&first.geometry)?,
            matches: matching.len(),
        })
    }
}

/// Property comparison: numbers compare as f64 so an integer selector
/// matches a float-encoded property, everything else by JSON equality.
fn values_match(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Interpret a GeoJSON geometry value as a single boundary polygon.
///
/// `Polygon` maps directly (first ring outer, rest holes). `MultiPolygon`
/// collapses to its largest-area member.
pub fn polygon_from_geojson(geometry: &Value) -> Result<Polygon2D> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidGeometry("geometry has no type".to_string()))?;

    match kind {
        "Polygon" => {
            let rings: Vec<Vec<[f64; 2]>> = coordinates(geometry)?;
            polygon_from_rings(&rings)
        }
        "MultiPolygon" => {
            let members: Vec<Vec<Vec<[f64; 2]>>> = coordinates(geometry)?;
            let polygons: Vec<Polygon2D> = members
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<_>>()?;
            polygons
                .into_iter()
                .max_by(|a, b| a.area().total_cmp(&b.area()))
                .ok_or_else(|| Error::InvalidGeometry("empty MultiPolygon".to_string()))
        }
        other => Err(Error::InvalidGeometry(format!(
            "unsupported boundary geometry type '{other}'"
        ))),
    }
}

/// Serialize clipped geometry back to a GeoJSON geometry value: `Polygon`
/// for a single piece, `MultiPolygon` otherwise.
pub fn geometry_to_geojson(pieces: &[Polygon2D]) -> Value {
    if pieces.len() == 1 {
        serde_json::json!({
            "type": "Polygon",
            "coordinates": polygon_rings(&pieces[0]),
        })
    } else {
        let coordinates: Vec<_> = pieces.iter().map(polygon_rings).collect();
        serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": coordinates,
        })
    }
}

fn coordinates<T: serde::de::DeserializeOwned>(geometry: &Value) -> Result<T> {
    let coords = geometry
        .get("coordinates")
        .ok_or_else(|| Error::InvalidGeometry("geometry has no coordinates".to_string()))?;
    Ok(serde_json::from_value(coords.clone())?)
}

fn polygon_from_rings(rings: &[Vec<[f64; 2]>]) -> Result<Polygon2D> {
    let mut parsed = rings.iter().map(|r| ring_from_positions(r));
    let outer = parsed
        .next()
        .transpose()?
        .ok_or_else(|| Error::InvalidGeometry("Polygon has no rings".to_string()))?;
    let holes = parsed.collect::<Result<Vec<_>>>()?;
    Ok(Polygon2D::with_holes(outer, holes))
}

fn ring_from_positions(positions: &[[f64; 2]]) -> Result<Vec<Point2<f64>>> {
    let mut ring: Vec<Point2<f64>> = positions.iter().map(|p| Point2::new(p[0], p[1])).collect();
    // GeoJSON rings repeat the first position at the end; drop the closure.
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(Error::InvalidGeometry(format!(
            "ring has only {} distinct positions",
            ring.len()
        )));
    }
    Ok(ring)
}

fn polygon_rings(polygon: &Polygon2D) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(&polygon.outer)
        .chain(polygon.holes.iter())
        .map(|ring| {
            let mut positions: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
            if let Some(first) = positions.first().copied() {
                positions.push(first);
            }
            positions
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const KLB_SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "OBJECTID": 1, "name": "kelani-lower" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "OBJECTID": 2, "name": "kelani-upper" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0], [10.0, 10.0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_select_by_attribute() {
        let source = BoundarySource::from_str(KLB_SAMPLE).unwrap();
        let selection = source
            .select("OBJECTID", &serde_json::json!(1))
            .unwrap();
        assert_eq!(selection.matches, 1);
        assert_relative_eq!(selection.polygon.area(), 16.0);
    }

    #[test]
    fn test_select_numeric_tolerant() {
        // Integer selector matches a float-encoded property.
        let source = BoundarySource::from_str(KLB_SAMPLE).unwrap();
        let selection = source
            .select("OBJECTID", &serde_json::json!(2.0))
            .unwrap();
        assert_relative_eq!(selection.polygon.area(), 1.0);
    }

    #[test]
    fn test_select_missing_is_error() {
        let source = BoundarySource::from_str(KLB_SAMPLE).unwrap();
        let result = source.select("OBJECTID", &serde_json::json!(99));
        assert!(matches!(result, Err(Error::BoundaryNotFound { .. })));
    }

    #[test]
    fn test_ambiguous_select_takes_first() {
        let ambiguous = KLB_SAMPLE.replace("\"OBJECTID\": 2", "\"OBJECTID\": 1");
        let source = BoundarySource::from_str(&ambiguous).unwrap();
        let selection = source
            .select("OBJECTID", &serde_json::json!(1))
            .unwrap();
        assert_eq!(selection.matches, 2);
        // First in file order wins.
        assert_relative_eq!(selection.polygon.area(), 16.0);
    }

    #[test]
    fn test_polygon_with_hole() {
        let geometry = serde_json::json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0], [1.0, 1.0]]
            ]
        });
        let polygon = polygon_from_geojson(&geometry).unwrap();
        assert_eq!(polygon.holes.len(), 1);
        assert_relative_eq!(polygon.area(), 15.0);
    }

    #[test]
    fn test_multipolygon_takes_largest() {
        let geometry = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                [[[5.0, 5.0], [9.0, 5.0], [9.0, 9.0], [5.0, 9.0], [5.0, 5.0]]]
            ]
        });
        let polygon = polygon_from_geojson(&geometry).unwrap();
        assert_relative_eq!(polygon.area(), 16.0);
    }

    #[test]
    fn test_unsupported_geometry() {
        let geometry = serde_json::json!({ "type": "Point", "coordinates": [0.0, 0.0] });
        assert!(matches!(
            polygon_from_geojson(&geometry),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_roundtrip_geometry() {
        let square = Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        let value = geometry_to_geojson(std::slice::from_ref(&square));
        let back = polygon_from_geojson(&value).unwrap();
        assert_relative_eq!(back.area(), 4.0);
    }
}

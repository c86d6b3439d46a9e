// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON serialization of a weight set.
//!
//! One feature per record with `id`, `lon`, `lat`, `area` properties; the
//! summary record is the last feature, mirroring the in-memory order.

use std::path::Path;

use serde_json::{json, Value};

use thiessen_core::geojson::geometry_to_geojson;

use crate::error::Result;
use crate::types::WeightSet;

/// Build a GeoJSON FeatureCollection value from a weight set.
pub fn to_feature_collection(weights: &WeightSet) -> Value {
    let features: Vec<Value> = weights
        .records
        .iter()
        .map(|record| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": record.id,
                    "lon": record.lon,
                    "lat": record.lat,
                    "area": record.area,
                },
                "geometry": geometry_to_geojson(&record.geometry),
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write the weight set to `path` as a GeoJSON FeatureCollection.
pub fn write_geojson(weights: &WeightSet, path: impl AsRef<Path>) -> Result<()> {
    let collection = to_feature_collection(weights);
    let content = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path.as_ref(), content)?;
    tracing::debug!(path = %path.as_ref().display(), features = weights.records.len(), "wrote result set");
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end pipeline tests: site set in, weight records out.

use approx::assert_relative_eq;
use nalgebra::Point2;
use thiessen_core::{Polygon2D, SiteSet};
use thiessen_processing::{
    compute_weights, compute_weights_from_source, to_feature_collection, ClipKind,
    ComputeOptions, Error, TOTAL_AREA_ID,
};

fn gauges() -> SiteSet {
    SiteSet::from_entries([
        ("colombo", [0.0, 0.0]),
        ("isurupaya", [2.0, 0.0]),
        ("borella", [1.0, 2.0]),
    ])
    .unwrap()
}

fn bounding_square() -> Polygon2D {
    Polygon2D::new(vec![
        Point2::new(-1.0, -1.0),
        Point2::new(3.0, -1.0),
        Point2::new(3.0, 3.0),
        Point2::new(-1.0, 3.0),
    ])
}

#[test]
fn minimal_three_site_partition() {
    let weights =
        compute_weights(&gauges(), &bounding_square(), &ComputeOptions::default()).unwrap();

    assert_eq!(weights.records.len(), 4);
    assert_eq!(weights.cell_count(), 3);

    // Cell records keep the input site order.
    let ids: Vec<&str> = weights.cells().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["colombo", "isurupaya", "borella"]);

    // Partition property: cells sum to the boundary area.
    assert_relative_eq!(weights.total_cell_area(), 16.0, max_relative = 1e-6);
    for record in weights.cells() {
        assert!(record.area > 0.0);
        assert!(!record.geometry.is_empty());
    }

    // Summary record is last, with the boundary's own centroid and area.
    let summary = weights.records.last().unwrap();
    assert_eq!(summary.id, TOTAL_AREA_ID);
    assert_relative_eq!(summary.area, 16.0);
    assert_relative_eq!(summary.lon, 1.0);
    assert_relative_eq!(summary.lat, 1.0);
}

#[test]
fn backends_agree_on_the_partition() {
    let overlay = compute_weights(&gauges(), &bounding_square(), &ComputeOptions::default())
        .unwrap();
    let bundled = compute_weights(
        &gauges(),
        &bounding_square(),
        &ComputeOptions {
            clip: ClipKind::SutherlandHodgman,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(overlay.cell_count(), bundled.cell_count());
    for (a, b) in overlay.cells().zip(bundled.cells()) {
        assert_eq!(a.id, b.id);
        assert_relative_eq!(a.area, b.area, max_relative = 1e-6);
    }
}

#[test]
fn out_of_range_site_excluded() {
    let sites = SiteSet::from_entries([
        ("colombo", [0.0, 0.0]),
        ("isurupaya", [2.0, 0.0]),
        ("borella", [1.0, 2.0]),
        ("remote", [100.0, 100.0]),
    ])
    .unwrap();

    let weights =
        compute_weights(&sites, &bounding_square(), &ComputeOptions::default()).unwrap();

    assert_eq!(weights.cell_count(), 3);
    assert!(weights.cells().all(|r| r.id != "remote"));
    assert_relative_eq!(weights.total_cell_area(), 16.0, max_relative = 1e-6);
}

#[test]
fn empty_partition_is_ok_not_error() {
    // Sites far from the boundary with a deliberately small radius: every
    // finite cell stays near the sites and misses the boundary.
    let sites = SiteSet::from_entries([
        ("a", [100.0, 100.0]),
        ("b", [102.0, 100.0]),
        ("c", [101.0, 102.0]),
    ])
    .unwrap();
    let boundary = Polygon2D::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ]);

    let weights = compute_weights(
        &sites,
        &boundary,
        &ComputeOptions {
            radius: Some(5.0),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(weights.is_empty_partition());
    assert_eq!(weights.records.len(), 1);
    assert_eq!(weights.records[0].id, TOTAL_AREA_ID);
}

#[test]
fn duplicate_sites_are_degenerate() {
    let sites = SiteSet::from_entries([
        ("a", [1.0, 1.0]),
        ("b", [1.0, 1.0]),
        ("c", [2.0, 2.0]),
    ])
    .unwrap();

    let result = compute_weights(&sites, &bounding_square(), &ComputeOptions::default());
    assert!(matches!(result, Err(Error::Geometry(_))));
}

#[test]
fn deterministic_output() {
    let options = ComputeOptions::default();
    let first = compute_weights(&gauges(), &bounding_square(), &options).unwrap();
    let second = compute_weights(&gauges(), &bounding_square(), &options).unwrap();

    // Bit-for-bit identical serialization, ordering included.
    let a = serde_json::to_string(&to_feature_collection(&first)).unwrap();
    let b = serde_json::to_string(&to_feature_collection(&second)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn boundary_source_roundtrip() {
    let dir = std::env::temp_dir().join(format!("thiessen-pipeline-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let boundary_path = dir.join("catchment.geojson");
    let output_path = dir.join("weights.geojson");

    std::fs::write(
        &boundary_path,
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "OBJECTID": 1 },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-1.0, -1.0], [3.0, -1.0], [3.0, 3.0], [-1.0, 3.0], [-1.0, -1.0]]]
                    }
                }
            ]
        }"#,
    )
    .unwrap();

    let weights = compute_weights_from_source(
        &gauges(),
        &boundary_path,
        "OBJECTID",
        &serde_json::json!(1),
        Some(&output_path),
        &ComputeOptions::default(),
    )
    .unwrap();
    assert_eq!(weights.cell_count(), 3);

    // The written file parses back with the same feature count and schema.
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(features[3]["properties"]["id"], TOTAL_AREA_ID);
    assert!(features[0]["properties"]["area"].as_f64().unwrap() > 0.0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_boundary_is_distinct_error() {
    let dir = std::env::temp_dir().join(format!("thiessen-missing-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let boundary_path = dir.join("catchment.geojson");
    std::fs::write(
        &boundary_path,
        r#"{ "type": "FeatureCollection", "features": [] }"#,
    )
    .unwrap();

    let result = compute_weights_from_source(
        &gauges(),
        &boundary_path,
        "OBJECTID",
        &serde_json::json!(1),
        None,
        &ComputeOptions::default(),
    );
    assert!(matches!(
        result,
        Err(Error::Core(thiessen_core::Error::BoundaryNotFound { .. }))
    ));

    std::fs::remove_dir_all(&dir).ok();
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The weighting pipeline: tessellate, reconstruct, clip, aggregate.
//!
//! A pure, deterministic batch transform from a site set and a boundary
//! polygon to a [`WeightSet`]. Per-site reconstruction and clipping have no
//! cross-site dependency once the tessellation is built, so they fan out
//! across a rayon pool; output order is the input site order regardless.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::Value;

use thiessen_core::{BoundarySource, Point2, Polygon2D, SiteSet};
use thiessen_geometry::{
    pieces_area, reconstruct, tessellate, ClipBackend, OverlayClip, ReconstructOptions,
    SutherlandHodgman,
};

use crate::error::Result;
use crate::output;
use crate::types::{CellRecord, WeightSet, TOTAL_AREA_ID};

/// Clip backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipKind {
    /// i_overlay boolean overlay (default).
    #[default]
    Overlay,
    /// Bundled Sutherland–Hodgman clipper.
    SutherlandHodgman,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct ComputeOptions {
    /// Far-vertex radius override. When absent the pipeline derives a safe
    /// radius from the combined extent of sites and boundary, so a boundary
    /// that outspans the gauges cannot truncate unbounded cells.
    pub radius: Option<f64>,
    pub clip: ClipKind,
}

/// Compute the area-weighted Thiessen partition of `boundary` around
/// `sites`.
///
/// Returns one [`CellRecord`] per site whose clipped cell is non-empty, in
/// input site order, followed by exactly one summary record for the
/// boundary itself.
pub fn compute_weights(
    sites: &SiteSet,
    boundary: &Polygon2D,
    options: &ComputeOptions,
) -> Result<WeightSet> {
    let started = Instant::now();
    tracing::info!(sites = sites.len(), "starting Thiessen weighting");

    let positions = sites.positions();
    let tessellation = tessellate(&positions)?;
    tracing::debug!(
        vertices = tessellation.vertices.len(),
        ridges = tessellation.ridges.len(),
        "tessellation built"
    );

    let radius = options
        .radius
        .unwrap_or_else(|| safe_radius(&positions, boundary));
    let finite = reconstruct(
        &tessellation,
        &ReconstructOptions {
            radius: Some(radius),
        },
    )?;

    let backend: &dyn ClipBackend = match options.clip {
        ClipKind::Overlay => &OverlayClip,
        ClipKind::SutherlandHodgman => &SutherlandHodgman,
    };

    let clipped: Vec<(Vec<Polygon2D>, f64)> = (0..sites.len())
        .into_par_iter()
        .map(|site| {
            let pieces = backend.intersection(&finite.polygon(site), boundary);
            let area = pieces_area(&pieces);
            (pieces, area)
        })
        .collect();

    let mut records = Vec::with_capacity(sites.len() + 1);
    for (site, (pieces, area)) in clipped.into_iter().enumerate() {
        if pieces.is_empty() || area <= 0.0 {
            tracing::debug!(site = %sites[site].id, "cell does not reach the boundary, excluded");
            continue;
        }
        let position = sites[site].position;
        records.push(CellRecord {
            id: sites[site].id.clone(),
            lon: position.x,
            lat: position.y,
            area,
            geometry: pieces,
        });
    }

    if records.is_empty() {
        tracing::warn!("no site cell intersects the boundary; emitting summary only");
    }

    let centroid = boundary.centroid();
    records.push(CellRecord {
        id: TOTAL_AREA_ID.to_string(),
        lon: centroid.x,
        lat: centroid.y,
        area: boundary.area(),
        geometry: vec![boundary.clone()],
    });

    tracing::info!(
        cells = records.len() - 1,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Thiessen weighting complete"
    );

    Ok(WeightSet { records })
}

/// Load the boundary from a GeoJSON collection, compute the partition and
/// optionally write the result set to a GeoJSON file.
pub fn compute_weights_from_source(
    sites: &SiteSet,
    boundary_path: impl AsRef<Path>,
    attribute: &str,
    value: &Value,
    output_path: Option<&Path>,
    options: &ComputeOptions,
) -> Result<WeightSet> {
    let source = BoundarySource::from_file(boundary_path)?;
    let selection = source.select(attribute, value)?;
    if selection.matches > 1 {
        tracing::warn!(
            attribute,
            %value,
            matches = selection.matches,
            "boundary selector is ambiguous, using the first feature in file order"
        );
    }

    let weights = compute_weights(sites, &selection.polygon, options)?;

    if let Some(path) = output_path {
        output::write_geojson(&weights, path)?;
    }

    Ok(weights)
}

/// Default far-vertex radius: four diagonals of the bounding box of sites
/// and boundary together. Large enough that the synthetic chord between two
/// far vertices can never cut back into the boundary.
fn safe_radius(positions: &[Point2<f64>], boundary: &Polygon2D) -> f64 {
    let mut min = positions[0];
    let mut max = positions[0];
    for p in positions.iter().skip(1).chain(boundary.outer.iter()) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let diagonal = ((max.x - min.x).powi(2) + (max.y - min.y).powi(2)).sqrt();
    (4.0 * diagonal).max(1.0)
}

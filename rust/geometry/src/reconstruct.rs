// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finite-region reconstruction.
//!
//! Every unbounded Voronoi region is closed off by synthesizing a far
//! vertex along each open ridge's outward direction, far enough from the
//! site cloud that the synthetic edge cannot affect intersection with a
//! bounded boundary polygon. Vertices live in a shared index arena: the
//! input vertices come first, synthesized far vertices are appended.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::tessellation::Tessellation;

/// Relative tolerance under which two synthesized far vertices count as
/// coincident, which would collapse a region edge.
const FAR_COINCIDENCE_EPS: f64 = 1e-9;

/// Options for region reconstruction.
#[derive(Debug, Clone, Default)]
pub struct ReconstructOptions {
    /// Distance from a ridge's finite endpoint to its synthesized far
    /// vertex. Defaults to the sites' largest per-axis extent, which is
    /// only safe when the boundary polygon does not outspan the sites;
    /// callers clipping against a larger boundary must override it.
    pub radius: Option<f64>,
}

/// Closed regions over a shared vertex arena, one per site in input order.
#[derive(Debug, Clone)]
pub struct FiniteRegions {
    pub vertices: Vec<Point2<f64>>,
    pub regions: Vec<Vec<usize>>,
}

impl FiniteRegions {
    /// The site's cell as a coordinate ring.
    pub fn polygon(&self, site: usize) -> Vec<Point2<f64>> {
        self.regions[site]
            .iter()
            .map(|&v| self.vertices[v])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

struct AdjacentRidge {
    other_site: usize,
    vertices: (Option<usize>, Option<usize>),
}

/// Convert every open region of `tessellation` into a closed simple polygon.
pub fn reconstruct(
    tessellation: &Tessellation,
    options: &ReconstructOptions,
) -> Result<FiniteRegions> {
    let sites = &tessellation.sites;
    let radius = match options.radius {
        Some(r) if r.is_finite() && r > 0.0 => r,
        Some(r) => {
            return Err(Error::DegenerateInput(format!(
                "far-vertex radius must be positive and finite, got {r}"
            )))
        }
        None => default_radius(sites),
    };
    let center = site_mean(sites);

    // Each ridge, seen from both of its endpoint sites.
    let mut adjacency: Vec<SmallVec<[AdjacentRidge; 8]>> =
        (0..sites.len()).map(|_| SmallVec::new()).collect();
    for ridge in &tessellation.ridges {
        let (p1, p2) = ridge.sites;
        adjacency[p1].push(AdjacentRidge {
            other_site: p2,
            vertices: ridge.vertices,
        });
        adjacency[p2].push(AdjacentRidge {
            other_site: p1,
            vertices: ridge.vertices,
        });
    }

    let mut vertices = tessellation.vertices.clone();
    let mut regions = Vec::with_capacity(tessellation.regions.len());

    for (p1, region) in tessellation.regions.iter().enumerate() {
        if region.iter().all(Option::is_some) {
            regions.push(region.iter().map(|v| v.unwrap()).collect());
            continue;
        }

        let mut new_region: Vec<usize> = region.iter().filter_map(|v| *v).collect();
        let mut far_vertices: SmallVec<[usize; 4]> = SmallVec::new();

        for ridge in &adjacency[p1] {
            // Orient so the missing endpoint (if any) comes first.
            let (v1, v2) = match ridge.vertices {
                (a, None) => (None, a),
                pair => pair,
            };
            if v1.is_some() {
                // Both endpoints finite: already part of the region.
                continue;
            }
            let v2 = v2.ok_or_else(|| {
                Error::DegenerateInput(format!(
                    "ridge between sites {p1} and {} has no finite endpoint",
                    ridge.other_site
                ))
            })?;

            let tangent = (sites[ridge.other_site] - sites[p1]).normalize();
            let normal = Vector2::new(-tangent.y, tangent.x);
            let midpoint = nalgebra::center(&sites[p1], &sites[ridge.other_site]);
            // Point the normal away from the site cloud's center. A zero dot
            // product resolves to the positive normal; collapsing the far
            // vertex onto the ridge endpoint is never acceptable.
            let outward = if (midpoint - center).dot(&normal) >= 0.0 {
                normal
            } else {
                -normal
            };
            let far = vertices[v2] + outward * radius;

            let index = vertices.len();
            vertices.push(far);
            new_region.push(index);
            far_vertices.push(index);
        }

        check_far_separation(&vertices, &far_vertices, radius)?;

        if new_region.len() < 3 {
            return Err(Error::DegenerateInput(format!(
                "region of site {p1} has only {} vertices after reconstruction",
                new_region.len()
            )));
        }

        sort_by_angle(&mut new_region, &vertices);
        regions.push(new_region);
    }

    Ok(FiniteRegions { vertices, regions })
}

/// Data-derived "distance to infinity": the sites' largest per-axis extent.
pub fn default_radius(sites: &[Point2<f64>]) -> f64 {
    let mut min = sites[0];
    let mut max = sites[0];
    for p in sites.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (max.x - min.x).max(max.y - min.y)
}

fn site_mean(sites: &[Point2<f64>]) -> Point2<f64> {
    let inv = 1.0 / sites.len() as f64;
    let (sx, sy) = sites
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx * inv, sy * inv)
}

fn check_far_separation(
    vertices: &[Point2<f64>],
    far_vertices: &[usize],
    radius: f64,
) -> Result<()> {
    let tolerance = FAR_COINCIDENCE_EPS * radius;
    for (k, &a) in far_vertices.iter().enumerate() {
        for &b in &far_vertices[k + 1..] {
            if (vertices[a] - vertices[b]).norm() < tolerance {
                return Err(Error::DegenerateInput(
                    "two synthesized far vertices coincide".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Re-order a region's vertices into a simple polygon: ascending angle of
/// `vertex - region centroid`. The sort is stable, so coincident vertices
/// keep their input order.
fn sort_by_angle(region: &mut [usize], vertices: &[Point2<f64>]) {
    let inv = 1.0 / region.len() as f64;
    let (cx, cy) = region.iter().fold((0.0, 0.0), |(sx, sy), &v| {
        (sx + vertices[v].x, sy + vertices[v].y)
    });
    let centroid = Point2::new(cx * inv, cy * inv);
    region.sort_by(|&a, &b| {
        let alpha = (vertices[a].y - centroid.y).atan2(vertices[a].x - centroid.x);
        let beta = (vertices[b].y - centroid.y).atan2(vertices[b].x - centroid.x);
        alpha.total_cmp(&beta)
    });
}

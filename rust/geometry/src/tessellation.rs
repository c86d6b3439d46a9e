// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unbounded planar Voronoi tessellation.
//!
//! Built on the Delaunay dual: every triangle circumcenter is a Voronoi
//! vertex, every Delaunay edge is a ridge between its two endpoint sites,
//! and hull edges become ridges with one endpoint "at infinity". Sites on
//! the convex hull get open regions, marked with a `None` entry.

use delaunator::{triangulate, Point, EMPTY};
use nalgebra::Point2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};

/// The shared boundary between two adjacent sites' regions.
///
/// `vertices` holds indices into [`Tessellation::vertices`]; `None` means
/// the ridge extends to infinity on that end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ridge {
    pub sites: (usize, usize),
    pub vertices: (Option<usize>, Option<usize>),
}

/// Voronoi diagram over a set of sites.
///
/// Regions are ordered vertex-index lists per site, in input site order.
/// A `None` entry marks an open (unbounded) edge of the region; bounded
/// regions are already in counter-clockwise order about their site.
#[derive(Debug, Clone)]
pub struct Tessellation {
    pub sites: Vec<Point2<f64>>,
    pub vertices: Vec<Point2<f64>>,
    pub ridges: Vec<Ridge>,
    pub regions: Vec<Vec<Option<usize>>>,
}

impl Tessellation {
    /// True if the site's region has no open edge.
    pub fn is_bounded(&self, site: usize) -> bool {
        self.regions[site].iter().all(Option::is_some)
    }
}

/// Build the Voronoi tessellation over `sites`.
///
/// Requires at least 3 distinct, non-collinear sites; anything less cannot
/// produce a Voronoi vertex and fails as degenerate input, as do duplicate
/// coordinates.
pub fn tessellate(sites: &[Point2<f64>]) -> Result<Tessellation> {
    if sites.len() < 2 {
        return Err(Error::DegenerateInput(format!(
            "at least 2 distinct sites required, got {}",
            sites.len()
        )));
    }
    check_distinct(sites)?;

    let points: Vec<Point> = sites.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let triangulation = triangulate(&points);
    let triangle_count = triangulation.triangles.len() / 3;
    if triangle_count == 0 {
        return Err(Error::DegenerateInput(
            "sites are collinear or too few to form a triangulation".to_string(),
        ));
    }

    // One Voronoi vertex per Delaunay triangle.
    let mut vertices = Vec::with_capacity(triangle_count);
    for t in 0..triangle_count {
        let a = sites[triangulation.triangles[3 * t]];
        let b = sites[triangulation.triangles[3 * t + 1]];
        let c = sites[triangulation.triangles[3 * t + 2]];
        vertices.push(circumcenter(a, b, c)?);
    }

    // Ridges from Delaunay edges. A halfedge with no twin lies on the hull:
    // its dual ridge runs from one circumcenter out to infinity.
    let mut ridges = Vec::new();
    for e in 0..triangulation.triangles.len() {
        let twin = triangulation.halfedges[e];
        let site_pair = (
            triangulation.triangles[e],
            triangulation.triangles[next_halfedge(e)],
        );
        if twin == EMPTY {
            ridges.push(Ridge {
                sites: site_pair,
                vertices: (None, Some(e / 3)),
            });
        } else if e < twin {
            ridges.push(Ridge {
                sites: site_pair,
                vertices: (Some(e / 3), Some(twin / 3)),
            });
        }
    }

    // Adjacent triangles per site.
    let mut site_triangles: Vec<Vec<usize>> = vec![Vec::new(); sites.len()];
    for t in 0..triangle_count {
        for &p in &triangulation.triangles[3 * t..3 * t + 3] {
            site_triangles[p].push(t);
        }
    }

    let hull: FxHashSet<usize> = triangulation.hull.iter().copied().collect();

    let mut regions = Vec::with_capacity(sites.len());
    for (i, adjacent) in site_triangles.iter().enumerate() {
        if adjacent.is_empty() {
            return Err(Error::DegenerateInput(format!(
                "site {i} is not part of the triangulation"
            )));
        }
        // A Voronoi cell is convex and contains its site, so sorting the
        // circumcenters by angle about the site yields the cell's winding.
        let mut ordered = adjacent.clone();
        ordered.sort_by(|&s, &t| {
            let a = angle_about(sites[i], vertices[s]);
            let b = angle_about(sites[i], vertices[t]);
            a.total_cmp(&b)
        });
        let mut region: Vec<Option<usize>> = ordered.into_iter().map(Some).collect();
        if hull.contains(&i) {
            region.push(None);
        }
        regions.push(region);
    }

    Ok(Tessellation {
        sites: sites.to_vec(),
        vertices,
        ridges,
        regions,
    })
}

fn check_distinct(sites: &[Point2<f64>]) -> Result<()> {
    let mut seen: FxHashMap<(u64, u64), usize> = FxHashMap::default();
    for (i, p) in sites.iter().enumerate() {
        if let Some(&j) = seen.get(&(p.x.to_bits(), p.y.to_bits())) {
            return Err(Error::DegenerateInput(format!(
                "sites {j} and {i} share the coordinate ({}, {})",
                p.x, p.y
            )));
        }
        seen.insert((p.x.to_bits(), p.y.to_bits()), i);
    }
    Ok(())
}

fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

fn angle_about(center: Point2<f64>, p: Point2<f64>) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Result<Point2<f64>> {
    let d = 2.0 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x));
    if d.abs() < f64::EPSILON {
        return Err(Error::DegenerateInput(
            "collinear triangle in the tessellation".to_string(),
        ));
    }
    let b2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    let c2 = (c.x - a.x).powi(2) + (c.y - a.y).powi(2);
    let ux = ((c.y - a.y) * b2 - (b.y - a.y) * c2) / d;
    let uy = ((b.x - a.x) * c2 - (c.x - a.x) * b2) / d;
    Ok(Point2::new(a.x + ux, a.y + uy))
}

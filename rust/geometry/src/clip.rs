// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary clipping backends.
//!
//! The intersection primitive (cell polygon ∩ boundary polygon) sits
//! behind the [`ClipBackend`] trait so numerical robustness can be
//! upgraded without touching the tessellation or reconstruction logic.
//! [`OverlayClip`] delegates to the i_overlay crate and is the default;
//! [`SutherlandHodgman`] is a bundled clipper that exploits the convexity
//! of Voronoi cells.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use thiessen_core::polygon::MIN_AREA_THRESHOLD;
use thiessen_core::{compute_signed_area, ensure_ccw, ensure_cw, Polygon2D};

/// Epsilon for half-plane membership in the bundled clipper.
const EDGE_EPSILON: f64 = 1e-12;

/// Geometric intersection capability.
///
/// `cell` is a single convex ring (a reconstructed Voronoi cell);
/// `boundary` may be concave and carry holes. The result is zero or more
/// polygon pieces; empty means no overlap.
pub trait ClipBackend: Sync {
    fn intersection(&self, cell: &[Point2<f64>], boundary: &Polygon2D) -> Vec<Polygon2D>;
}

/// Total area over the pieces of a clipped cell.
pub fn pieces_area(pieces: &[Polygon2D]) -> f64 {
    pieces.iter().map(Polygon2D::area).sum()
}

/// i_overlay-backed clipper (default backend).
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlayClip;

impl ClipBackend for OverlayClip {
    fn intersection(&self, cell: &[Point2<f64>], boundary: &Polygon2D) -> Vec<Polygon2D> {
        if cell.len() < 3 {
            return Vec::new();
        }

        let subject = boundary_to_paths(boundary);
        let clip = vec![ring_to_path(&ensure_ccw(cell))];

        // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
        let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

        shapes
            .iter()
            .filter_map(|shape| shape_to_polygon(shape))
            .collect()
    }
}

/// Bundled Sutherland–Hodgman clipper.
///
/// Clips the boundary's rings against the convex cell, one half-plane per
/// cell edge. Disconnected intersections come back as a single ring with
/// zero-width bridges along the cell edges; the enclosed area is still
/// correct, which is what the aggregation needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SutherlandHodgman;

impl ClipBackend for SutherlandHodgman {
    fn intersection(&self, cell: &[Point2<f64>], boundary: &Polygon2D) -> Vec<Polygon2D> {
        if cell.len() < 3 {
            return Vec::new();
        }
        let cell = ensure_ccw(cell);

        let outer = clip_ring_convex(&boundary.outer, &cell);
        if outer.len() < 3 || compute_signed_area(&outer).abs() < MIN_AREA_THRESHOLD {
            return Vec::new();
        }

        let holes: Vec<Vec<Point2<f64>>> = boundary
            .holes
            .iter()
            .map(|hole| clip_ring_convex(hole, &cell))
            .filter(|h| h.len() >= 3 && compute_signed_area(h).abs() >= MIN_AREA_THRESHOLD)
            .map(|h| ensure_cw(&h))
            .collect();

        vec![Polygon2D::with_holes(outer, holes)]
    }
}

/// Clip an arbitrary ring against a counter-clockwise convex ring.
fn clip_ring_convex(ring: &[Point2<f64>], cell: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut output = ring.to_vec();
    let n = cell.len();

    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let a = cell[i];
        let b = cell[(i + 1) % n];

        let input = std::mem::take(&mut output);
        let mut prev = *input.last().expect("non-empty input ring");
        let mut prev_dist = signed_distance(a, b, prev);
        for &curr in &input {
            let curr_dist = signed_distance(a, b, curr);
            if curr_dist >= -EDGE_EPSILON {
                if prev_dist < -EDGE_EPSILON {
                    output.push(edge_intersection(prev, curr, prev_dist, curr_dist));
                }
                output.push(curr);
            } else if prev_dist >= -EDGE_EPSILON {
                output.push(edge_intersection(prev, curr, prev_dist, curr_dist));
            }
            prev = curr;
            prev_dist = curr_dist;
        }
    }

    output
}

/// Signed distance of `p` from the directed line a→b; positive = left side
/// (inside, for a counter-clockwise cell).
fn signed_distance(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn edge_intersection(
    p: Point2<f64>,
    q: Point2<f64>,
    p_dist: f64,
    q_dist: f64,
) -> Point2<f64> {
    let denom = p_dist - q_dist;
    let t = if denom.abs() < EDGE_EPSILON {
        0.5
    } else {
        (p_dist / denom).clamp(0.0, 1.0)
    };
    Point2::new(p.x + (q.x - p.x) * t, p.y + (q.y - p.y) * t)
}

fn boundary_to_paths(boundary: &Polygon2D) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + boundary.holes.len());
    paths.push(ring_to_path(&boundary.outer));
    for hole in &boundary.holes {
        paths.push(ring_to_path(hole));
    }
    paths
}

fn ring_to_path(ring: &[Point2<f64>]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert one i_overlay shape (first contour outer, rest holes) back to a
/// polygon, dropping degenerate results.
fn shape_to_polygon(shape: &[Vec<[f64; 2]>]) -> Option<Polygon2D> {
    let outer: Vec<Point2<f64>> = shape.first()?.iter().map(|p| Point2::new(p[0], p[1])).collect();
    if outer.len() < 3 || compute_signed_area(&outer).abs() < MIN_AREA_THRESHOLD {
        return None;
    }

    let holes: Vec<Vec<Point2<f64>>> = shape
        .iter()
        .skip(1)
        .map(|contour| {
            contour
                .iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect::<Vec<_>>()
        })
        .filter(|h| h.len() >= 3 && compute_signed_area(h).abs() >= MIN_AREA_THRESHOLD)
        .collect();

    Some(Polygon2D::with_holes(outer, holes))
}

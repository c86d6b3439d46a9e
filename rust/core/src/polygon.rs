// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon primitives.
//!
//! A [`Polygon2D`] is one outer ring plus zero or more holes, the shape of a
//! catchment boundary or of a clipped Voronoi cell. Winding is normalized on
//! construction: outer counter-clockwise, holes clockwise.

use nalgebra::Point2;

/// Minimum area threshold - rings smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// A simple polygon with optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer ring, counter-clockwise.
    pub outer: Vec<Point2<f64>>,
    /// Hole rings, clockwise.
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Polygon2D {
    /// Create a polygon from an outer ring, normalizing winding to CCW.
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer: ensure_ccw(&outer),
            holes: Vec::new(),
        }
    }

    /// Create a polygon with holes, normalizing outer to CCW and holes to CW.
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self {
            outer: ensure_ccw(&outer),
            holes: holes.iter().map(|h| ensure_cw(h)).collect(),
        }
    }

    /// Total enclosed area: outer ring area minus hole areas, never negative.
    pub fn area(&self) -> f64 {
        let outer = compute_signed_area(&self.outer).abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        (outer - holes).max(0.0)
    }

    /// Area-weighted centroid, holes subtracted.
    ///
    /// Relies on the normalized winding: the outer ring contributes positive
    /// signed area, holes negative, so one accumulation pass covers both.
    pub fn centroid(&self) -> Point2<f64> {
        let mut area_sum = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for ring in std::iter::once(&self.outer).chain(self.holes.iter()) {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let p = ring[i];
                let q = ring[(i + 1) % n];
                let cross = p.x * q.y - q.x * p.y;
                area_sum += cross;
                cx += (p.x + q.x) * cross;
                cy += (p.y + q.y) * cross;
            }
        }
        if area_sum.abs() < MIN_AREA_THRESHOLD {
            // Degenerate ring set: fall back to the vertex mean.
            return vertex_mean(&self.outer);
        }
        let scale = 1.0 / (3.0 * area_sum);
        Point2::new(cx * scale, cy * scale)
    }

    /// Axis-aligned bounding box of the outer ring.
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        ring_bounds(&self.outer)
    }

    /// Largest per-axis extent of the outer ring's bounding box.
    pub fn span(&self) -> f64 {
        match self.bounds() {
            Some((min, max)) => (max.x - min.x).max(max.y - min.y),
            None => 0.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.outer.len() < 3 || self.area() < MIN_AREA_THRESHOLD
    }
}

/// Compute the signed area of a 2D ring.
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = ring.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }

    area * 0.5
}

/// Ensure a ring has counter-clockwise winding (positive area)
pub fn ensure_ccw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(ring) < 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Ensure a ring has clockwise winding (for holes)
pub fn ensure_cw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(ring) > 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Compute bounding box of a ring
pub fn ring_bounds(ring: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if ring.is_empty() {
        return None;
    }

    let mut min = ring[0];
    let mut max = ring[0];

    for p in ring.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

fn vertex_mean(ring: &[Point2<f64>]) -> Point2<f64> {
    if ring.is_empty() {
        return Point2::origin();
    }
    let inv = 1.0 / ring.len() as f64;
    let (sx, sy) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx * inv, sy * inv)
}

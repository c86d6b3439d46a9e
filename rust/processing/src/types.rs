// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result-set types for the weighting pipeline.

use thiessen_core::Polygon2D;

/// Reserved identifier of the summary record carrying the boundary's own
/// centroid and area.
pub const TOTAL_AREA_ID: &str = "__total_area__";

/// One surviving site's clipped cell, or the trailing summary record.
#[derive(Debug, Clone)]
pub struct CellRecord {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    /// Clipped cell area; strictly positive for site records.
    pub area: f64,
    /// Clipped cell pieces (one polygon for most cells; multiple when a
    /// concave or holed boundary splits the intersection).
    pub geometry: Vec<Polygon2D>,
}

impl CellRecord {
    pub fn is_summary(&self) -> bool {
        self.id == TOTAL_AREA_ID
    }
}

/// Ordered cell records (input site order) followed by exactly one summary
/// record. Purely functional: computed once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct WeightSet {
    pub records: Vec<CellRecord>,
}

impl WeightSet {
    /// Number of site cell records, excluding the summary.
    pub fn cell_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.is_summary())
            .count()
    }

    /// Site cell records in input order.
    pub fn cells(&self) -> impl Iterator<Item = &CellRecord> {
        self.records.iter().filter(|r| !r.is_summary())
    }

    /// The boundary summary record.
    pub fn summary(&self) -> Option<&CellRecord> {
        self.records.iter().find(|r| r.is_summary())
    }

    /// True when no site cell intersected the boundary: a valid but
    /// noteworthy outcome, distinct from any failure.
    pub fn is_empty_partition(&self) -> bool {
        self.cell_count() == 0
    }

    /// Sum of the site cell areas. For a boundary inside the sites'
    /// convex hull this approximates the boundary's own area.
    pub fn total_cell_area(&self) -> f64 {
        self.cells().map(|r| r.area).sum()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered site sets.
//!
//! A site is one rain gauge or model grid node: a unique identifier plus a
//! planar coordinate. The order in which sites are loaded defines the order
//! of every downstream iteration, so results are reproducible for a given
//! input sequence.

use nalgebra::Point2;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// One input sample point: the generator of one Voronoi cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub position: Point2<f64>,
}

impl Site {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Point2::new(x, y),
        }
    }
}

/// Immutable, ordered collection of sites.
#[derive(Debug, Clone, Default)]
pub struct SiteSet {
    sites: Vec<Site>,
}

impl SiteSet {
    /// Build a site set from `(id, [x, y])` entries, preserving input order.
    ///
    /// Identifiers must be unique; coordinate values must be finite.
    /// Coordinate duplicates are deliberately NOT rejected here — they are a
    /// property of the tessellation input and surface as a degenerate-input
    /// error there.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, [f64; 2])>,
        S: Into<String>,
    {
        let mut sites = Vec::new();
        let mut seen = FxHashSet::default();
        for (id, [x, y]) in entries {
            let id = id.into();
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::InvalidSites(format!(
                    "site '{id}' has a non-finite coordinate ({x}, {y})"
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(Error::InvalidSites(format!("duplicate site id '{id}'")));
            }
            sites.push(Site::new(id, x, y));
        }
        Ok(Self { sites })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    /// Site coordinates in input order.
    pub fn positions(&self) -> Vec<Point2<f64>> {
        self.sites.iter().map(|s| s.position).collect()
    }
}

impl std::ops::Index<usize> for SiteSet {
    type Output = Site;

    fn index(&self, index: usize) -> &Site {
        &self.sites[index]
    }
}

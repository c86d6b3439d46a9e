//! Thiessen Core
//!
//! Site sets, polygon primitives and GeoJSON boundary sources for
//! area-weighted Thiessen (Voronoi) rainfall interpolation. The geometric
//! algorithms live in `thiessen-geometry`; this crate owns the data they
//! operate on.

pub mod error;
pub mod geojson;
pub mod polygon;
pub mod site;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use error::{Error, Result};
pub use geojson::{polygon_from_geojson, BoundarySelection, BoundarySource};
pub use polygon::{compute_signed_area, ensure_ccw, ensure_cw, Polygon2D};
pub use site::{Site, SiteSet};

//! Thiessen Geometry
//!
//! Voronoi tessellation over gauge sites, finite-region reconstruction and
//! boundary clipping. The three stages are pure functions: tessellate,
//! close off every unbounded region, intersect each cell with a catchment
//! boundary.

pub mod clip;
pub mod error;
pub mod reconstruct;
pub mod tessellation;

pub use clip::{pieces_area, ClipBackend, OverlayClip, SutherlandHodgman};
pub use error::{Error, Result};
pub use reconstruct::{reconstruct, FiniteRegions, ReconstructOptions};
pub use tessellation::{tessellate, Ridge, Tessellation};

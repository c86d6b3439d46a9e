//! Thiessen Processing
//!
//! The shared weighting pipeline: load a site set and a catchment boundary,
//! compute the area-weighted Thiessen partition, and hand the record set to
//! whatever consumes it (in-memory aggregation or a GeoJSON file).
//!
//! The surrounding system — fetching weather-model output, pushing rows to
//! a relational store, scheduling — lives outside this workspace and only
//! interacts with these types.

pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

pub use error::{Error, Result};
pub use output::{to_feature_collection, write_geojson};
pub use pipeline::{compute_weights, compute_weights_from_source, ClipKind, ComputeOptions};
pub use types::{CellRecord, WeightSet, TOTAL_AREA_ID};

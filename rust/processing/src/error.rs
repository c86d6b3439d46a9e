use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the weighting pipeline.
///
/// The stages stay distinguishable for callers: degenerate site input
/// arrives as [`Error::Geometry`], a failed boundary lookup as
/// [`Error::Core`] with
/// [`thiessen_core::Error::BoundaryNotFound`], and output
/// serialization as [`Error::Io`]/[`Error::Json`]. An empty partition is
/// not an error; see `WeightSet::cell_count`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("boundary/site input error: {0}")]
    Core(#[from] thiessen_core::Error),

    #[error("geometry error: {0}")]
    Geometry(#[from] thiessen_geometry::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

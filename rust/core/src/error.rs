use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading sites or boundary geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no boundary feature with {attribute} = {value}")]
    BoundaryNotFound { attribute: String, value: String },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid site set: {0}")]
    InvalidSites(String),
}

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during tessellation and region reconstruction
#[derive(Error, Debug)]
pub enum Error {
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("core error: {0}")]
    CoreError(#[from] thiessen_core::Error),
}

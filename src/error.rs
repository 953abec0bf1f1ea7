//! Crate-level error type and `Result` alias.
//! Wraps raster I/O failures and provides semantic variants for the
//! tiling, stitching and resizing preconditions.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Raster error: {0}")]
    Raster(#[from] crate::io::RasterError),

    #[error("Invalid dimension: {name} must be greater than 0, got: {value}")]
    InvalidDimension { name: &'static str, value: usize },

    #[error(
        "Source {rows}x{cols} is smaller than one {tile_rows}x{tile_cols} tile, no tiles produced"
    )]
    EmptyResult {
        rows: usize,
        cols: usize,
        tile_rows: usize,
        tile_cols: usize,
    },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Resize error: {0}")]
    Resize(String),
}

impl Error {
    pub fn resize<E: std::fmt::Display>(e: E) -> Self {
        Error::Resize(e.to_string())
    }

    pub(crate) fn invalid_dimension(name: &'static str, value: usize) -> Self {
        Error::InvalidDimension { name, value }
    }
}

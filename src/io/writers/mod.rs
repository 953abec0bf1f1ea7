//! Raster writers.
pub mod tiff;

//! Core building blocks: reflect padding, tiling, stitching and resizing,
//! plus the serializable `TilingParams`. These are the primitives consumed by
//! the high-level `api` module.
pub mod params;
pub mod processing;

pub mod padding;
pub mod resize;
pub mod stitching;
pub mod tiling;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{DEFAULT_TILE_SIZE, TileShape};

/// Tiling parameters suitable for config files and presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingParams {
    /// Tile height before padding
    pub tile_rows: usize,
    /// Tile width before padding
    pub tile_cols: usize,
    /// Reflected pixels added on each side of every tile
    pub pad: usize,
    /// Pixels removed from each side of every tile before stitching
    pub crop: usize,
}

impl Default for TilingParams {
    fn default() -> Self {
        Self {
            tile_rows: DEFAULT_TILE_SIZE,
            tile_cols: DEFAULT_TILE_SIZE,
            pad: 0,
            crop: 0,
        }
    }
}

impl TilingParams {
    /// Parameters whose crop undoes the padding exactly.
    pub fn matched(tile_shape: TileShape, pad: usize) -> Self {
        Self {
            tile_rows: tile_shape.rows(),
            tile_cols: tile_shape.cols(),
            pad,
            crop: pad,
        }
    }

    pub fn tile_shape(&self) -> Result<TileShape> {
        TileShape::new(self.tile_rows, self.tile_cols)
    }

    /// Check tile sizes are positive. A crop that differs from the pad is
    /// allowed; see [`TilingParams::is_exact_inverse`].
    pub fn validate(&self) -> Result<()> {
        self.tile_shape().map(|_| ())
    }

    pub fn is_exact_inverse(&self) -> bool {
        self.crop == self.pad
    }

    /// Spatial size of every tile as stored in a grid, padding included.
    pub fn padded_tile_dims(&self) -> Result<(usize, usize)> {
        self.tile_shape()?.padded(self.pad)
    }

    /// Size the stitcher expects after cropping a padded tile.
    pub fn stitched_tile_shape(&self) -> Result<TileShape> {
        let (rows, cols) = self.padded_tile_dims()?;
        let border = self.crop.saturating_mul(2);
        let cropped_rows = rows.saturating_sub(border);
        let cropped_cols = cols.saturating_sub(border);
        TileShape::new(cropped_rows, cropped_cols).map_err(|_| Error::ShapeMismatch {
            expected: "a non-empty tile after cropping".to_string(),
            actual: format!("crop={} on {}x{} tiles", self.crop, rows, cols),
        })
    }
}

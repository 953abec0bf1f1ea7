use std::path::Path;

use ndarray::parallel::prelude::*;
use ndarray::{Array4, ArrayView3, Axis, s};
use tracing::{debug, info};

use crate::core::processing::padding::reflect_pad_into;
use crate::error::{Error, Result};
use crate::io::load_image;
use crate::types::{Sample, TileGrid, TileShape, grid_position};

/// Input accepted by [`partition`]: an in-memory channel-last array or a
/// raster path resolved through [`load_image`].
#[derive(Debug, Clone, Copy)]
pub enum TileSource<'a, T> {
    Array(ArrayView3<'a, T>),
    Path(&'a Path),
}

impl<'a, T> From<ArrayView3<'a, T>> for TileSource<'a, T> {
    fn from(view: ArrayView3<'a, T>) -> Self {
        TileSource::Array(view)
    }
}

impl<'a, T> From<&'a Path> for TileSource<'a, T> {
    fn from(path: &'a Path) -> Self {
        TileSource::Path(path)
    }
}

/// Split `source` into a row-major grid of `tile_shape` tiles, each
/// reflect-padded by `pad` pixels per side.
pub fn partition<T: Sample>(
    source: TileSource<'_, T>,
    tile_shape: TileShape,
    pad: usize,
) -> Result<TileGrid<T>> {
    match source {
        TileSource::Array(image) => partition_array(image, tile_shape, pad),
        TileSource::Path(path) => {
            info!("Loading {:?} for tiling", path);
            let image = load_image::<T>(path)?;
            partition_array(image.view(), tile_shape, pad)
        }
    }
}

/// Split an in-memory `(rows, cols, channels)` image into tiles.
///
/// Rows and columns that do not fill a whole tile at the bottom and right
/// edges are discarded. Tile `ndx` covers grid position
/// `(ndx / grid_cols, ndx % grid_cols)`.
pub fn partition_array<T: Sample>(
    image: ArrayView3<'_, T>,
    tile_shape: TileShape,
    pad: usize,
) -> Result<TileGrid<T>> {
    let (rows, cols, channels) = image.dim();
    let (tile_rows, tile_cols) = (tile_shape.rows(), tile_shape.cols());

    let grid_cols = cols / tile_cols;
    let grid_rows = rows / tile_rows;
    if grid_cols == 0 || grid_rows == 0 {
        return Err(Error::EmptyResult {
            rows,
            cols,
            tile_rows,
            tile_cols,
        });
    }

    let (dropped_rows, dropped_cols) = (rows % tile_rows, cols % tile_cols);
    if dropped_rows > 0 || dropped_cols > 0 {
        debug!(
            "Discarding {} bottom rows and {} right columns to fit whole tiles",
            dropped_rows, dropped_cols
        );
    }

    info!(
        "Partitioning {}x{}x{} image into {}x{} grid of {} tiles (pad={})",
        rows, cols, channels, grid_rows, grid_cols, tile_shape, pad
    );

    let (padded_rows, padded_cols) = tile_shape.padded(pad)?;
    let cropped = image.slice(s![..grid_rows * tile_rows, ..grid_cols * tile_cols, ..]);
    let mut tiles = Array4::from_elem(
        (grid_rows * grid_cols, padded_rows, padded_cols, channels),
        T::default(),
    );

    // Each tile owns a disjoint slot of the arena, so slots fill in parallel
    tiles
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(ndx, mut slot)| {
            let (row_band, col_band) = grid_position(ndx, grid_cols);
            let row_start = row_band * tile_rows;
            let col_start = col_band * tile_cols;
            let tile = cropped.slice(s![
                row_start..row_start + tile_rows,
                col_start..col_start + tile_cols,
                ..
            ]);
            if pad > 0 {
                reflect_pad_into(tile, pad, slot);
            } else {
                slot.assign(&tile);
            }
        });

    TileGrid::from_parts(tiles, grid_cols, grid_rows)
}

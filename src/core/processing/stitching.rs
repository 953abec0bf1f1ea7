use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView4, Axis, s};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Sample, TileGrid, TileShape, grid_position};

/// Reassemble row-major `tiles` of shape `(num_tiles, rows, cols, channels)`
/// into one `(tile_rows * grid_rows, tile_cols * grid_cols, channels)` image.
///
/// `crop` pixels are removed from every spatial side of each tile before
/// placement, and what remains must be exactly `tile_rows x tile_cols`.
///
/// `crop` is not required to equal the padding the tiles were built with.
/// Passing tile dimensions that match the cropped tiles is enough for the call
/// to succeed, so a crop that differs from the pad silently shifts content
/// inside every tile. Callers that want the exact inverse of
/// [`partition`](crate::core::processing::tiling::partition) must use
/// `crop == pad`.
pub fn assemble_tiles<T: Sample>(
    tiles: ArrayView4<'_, T>,
    grid_cols: usize,
    grid_rows: usize,
    tile_cols: usize,
    tile_rows: usize,
    crop: usize,
) -> Result<Array3<T>> {
    if tile_rows == 0 {
        return Err(Error::invalid_dimension("tile_rows", tile_rows));
    }
    if tile_cols == 0 {
        return Err(Error::invalid_dimension("tile_cols", tile_cols));
    }

    let (num_tiles, rows, cols, channels) = tiles.dim();
    if grid_cols.checked_mul(grid_rows) != Some(num_tiles) {
        return Err(Error::ShapeMismatch {
            expected: format!("{}x{} grid of tiles", grid_rows, grid_cols),
            actual: format!("{} tiles", num_tiles),
        });
    }

    let border = crop.checked_mul(2);
    let cropped_rows = border.and_then(|b| rows.checked_sub(b));
    let cropped_cols = border.and_then(|b| cols.checked_sub(b));
    if cropped_rows != Some(tile_rows) || cropped_cols != Some(tile_cols) {
        return Err(Error::ShapeMismatch {
            expected: format!("{}x{}x{} tiles after cropping", tile_rows, tile_cols, channels),
            actual: format!("{}x{}x{} tiles with crop={}", rows, cols, channels, crop),
        });
    }

    info!(
        "Stitching {} tiles into {}x{} grid of {}x{} (crop={})",
        num_tiles, grid_rows, grid_cols, tile_rows, tile_cols, crop
    );

    let mut stitched = Array3::from_elem(
        (tile_rows * grid_rows, tile_cols * grid_cols, channels),
        T::default(),
    );
    if num_tiles == 0 {
        debug!("No tiles to stitch, returning empty image");
        return Ok(stitched);
    }

    // Row bands are disjoint slices of the output
    let bands: Vec<_> = stitched.axis_chunks_iter_mut(Axis(0), tile_rows).collect();
    bands
        .into_par_iter()
        .enumerate()
        .for_each(|(band, mut band_view)| {
            for ndx in band * grid_cols..(band + 1) * grid_cols {
                let (row_band, col_band) = grid_position(ndx, grid_cols);
                debug_assert_eq!(row_band, band);
                let col_start = col_band * tile_cols;
                let tile = tiles.slice(s![
                    ndx,
                    crop..crop + tile_rows,
                    crop..crop + tile_cols,
                    ..
                ]);
                band_view
                    .slice_mut(s![.., col_start..col_start + tile_cols, ..])
                    .assign(&tile);
            }
        });

    Ok(stitched)
}

/// Reassemble a [`TileGrid`] whose tiles, after cropping, are `tile_shape`.
pub fn assemble<T: Sample>(grid: &TileGrid<T>, tile_shape: TileShape, crop: usize) -> Result<Array3<T>> {
    let (tile_rows, tile_cols) = grid.tile_dims();
    if tile_shape.padded(crop).ok() != Some((tile_rows, tile_cols)) {
        debug!(
            "Stored tiles are {}x{}, cropping {} per side towards {}",
            tile_rows,
            tile_cols,
            crop,
            tile_shape
        );
    }
    assemble_tiles(
        grid.tiles(),
        grid.grid_cols(),
        grid.grid_rows(),
        tile_shape.cols(),
        tile_shape.rows(),
        crop,
    )
}

impl<T: Sample> TileGrid<T> {
    /// Stitch this grid back together; see [`assemble_tiles`].
    pub fn assemble(&self, tile_shape: TileShape, crop: usize) -> Result<Array3<T>> {
        assemble(self, tile_shape, crop)
    }
}

//! High-level library API: tile a raster path, stitch a grid back to a
//! GeoTIFF, and run a per-tile closure over a whole image in one call.
//! Prefer these entrypoints over the low-level processing modules.
use std::path::Path;

use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView3, Axis};
use tracing::{info, warn};

use crate::core::params::TilingParams;
use crate::core::processing::stitching::assemble;
use crate::core::processing::tiling::{TileSource, partition, partition_array};
use crate::error::{Error, Result};
use crate::io::{load_image, save_image};
use crate::types::{Sample, TileGrid};

fn log_crop_mismatch(params: &TilingParams) {
    if !params.is_exact_inverse() {
        warn!(
            "crop={} differs from pad={}; stitched tiles will not line up with the source",
            params.crop, params.pad
        );
    }
}

/// Load `input` and split it into tiles according to `params`.
pub fn tile_path<T: Sample>(input: &Path, params: &TilingParams) -> Result<TileGrid<T>> {
    partition(TileSource::Path(input), params.tile_shape()?, params.pad)
}

/// Stitch `grid` using `params` and write the result to `output` as a GeoTIFF.
pub fn stitch_to_path<T: Sample>(
    grid: &TileGrid<T>,
    output: &Path,
    params: &TilingParams,
) -> Result<()> {
    log_crop_mismatch(params);
    let stitched = assemble(grid, params.tile_shape()?, params.crop)?;
    save_image(stitched.view(), output)?;
    Ok(())
}

/// Apply `f` to every tile in parallel, keeping grid order.
///
/// Every returned tile must have the same shape.
pub fn map_tiles<T, F>(grid: &TileGrid<T>, f: F) -> Result<TileGrid<T>>
where
    T: Sample,
    F: Fn(ArrayView3<'_, T>) -> Array3<T> + Sync + Send,
{
    let processed: Vec<Array3<T>> = grid
        .tiles()
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(&f)
        .collect();

    let Some(first) = processed.first() else {
        return Ok(grid.clone());
    };
    let expected = first.dim();
    if let Some((ndx, bad)) = processed.iter().enumerate().find(|(_, t)| t.dim() != expected) {
        return Err(Error::ShapeMismatch {
            expected: format!("{:?} for every processed tile", expected),
            actual: format!("{:?} for tile {}", bad.dim(), ndx),
        });
    }

    let views: Vec<ArrayView3<'_, T>> = processed.iter().map(|t| t.view()).collect();
    let tiles = ndarray::stack(Axis(0), &views).map_err(|e| Error::ShapeMismatch {
        expected: format!("{:?} for every processed tile", expected),
        actual: e.to_string(),
    })?;
    TileGrid::from_parts(tiles, grid.grid_cols(), grid.grid_rows())
}

/// Partition `image`, run `f` on every tile, and stitch the results.
///
/// `f` receives padded tiles and should return tiles of the same size for
/// `crop == pad` to reproduce the cropped source layout.
pub fn process_tiled<T, F>(image: ArrayView3<'_, T>, params: &TilingParams, f: F) -> Result<Array3<T>>
where
    T: Sample,
    F: Fn(ArrayView3<'_, T>) -> Array3<T> + Sync + Send,
{
    log_crop_mismatch(params);
    let tile_shape = params.tile_shape()?;
    let grid = partition_array(image, tile_shape, params.pad)?;
    let processed = map_tiles(&grid, f)?;
    assemble(&processed, tile_shape, params.crop)
}

/// Full pipeline from one raster file to another:
/// load, partition, per-tile `f`, stitch, save.
pub fn process_path_to_path<T, F>(
    input: &Path,
    output: &Path,
    params: &TilingParams,
    f: F,
) -> Result<()>
where
    T: Sample,
    F: Fn(ArrayView3<'_, T>) -> Array3<T> + Sync + Send,
{
    info!("Processing {:?} -> {:?}", input, output);
    let image = load_image::<T>(input)?;
    let stitched = process_tiled(image.view(), params, f)?;
    save_image(stitched.view(), output)?;
    info!("Successfully processed: {:?} -> {:?}", input, output);
    Ok(())
}

#![doc = r#"
RASTILE — split large rasters into tiles and stitch them back together.

This crate partitions a channel-last raster into a regular grid of fixed-size
tiles, optionally reflect-padding every tile so per-tile processing (for
example a model with a limited receptive field) sees context past the tile
edge. The stitcher is the structural inverse: it crops a border from every
tile and places the tiles back in row-major order. A small aspect-preserving
resize helper and GeoTIFF load/save helpers round out the pipeline.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Tile and stitch in memory
-------------------------
```rust
use ndarray::Array3;
use rastile::{TileShape, partition_array, assemble};

fn main() -> rastile::Result<()> {
    let image = Array3::<u16>::zeros((1024, 1024, 1));
    let shape = TileShape::square(512)?;

    let grid = partition_array(image.view(), shape, 0)?;
    assert_eq!((grid.grid_rows(), grid.grid_cols()), (2, 2));

    let stitched = assemble(&grid, shape, 0)?;
    assert_eq!(stitched, image);
    Ok(())
}
```

Padded tiles and per-tile processing
------------------------------------
Tiles are reflect-padded by `pad` pixels per side. Cropping the same amount
while stitching undoes the padding exactly.

```rust
use ndarray::Array3;
use rastile::{TileShape, TilingParams, process_tiled};

fn main() -> rastile::Result<()> {
    let image = Array3::<f32>::from_elem((600, 800, 3), 0.5);
    let params = TilingParams::matched(TileShape::square(256)?, 16);

    // each closure call sees a 288x288x3 tile
    let out = process_tiled(image.view(), &params, |tile| tile.mapv(|v| v * 2.0))?;

    // 600x800 holds a 2x3 grid of whole tiles; the remainder is discarded
    assert_eq!(out.dim(), (512, 768, 3));
    Ok(())
}
```

Files end to end
----------------
```rust,no_run
use std::path::Path;
use rastile::{TilingParams, process_path_to_path};

fn main() -> rastile::Result<()> {
    let params = TilingParams { pad: 32, crop: 32, ..TilingParams::default() };
    process_path_to_path::<u8, _>(
        Path::new("/data/scene.tif"),
        Path::new("/out/scene_processed.tif"),
        &params,
        |tile| tile.to_owned(),
    )
}
```

Crop versus pad
---------------
The stitcher does not require `crop == pad`. Any crop is accepted as long as
the cropped tiles match the declared tile size, which lets a caller strip the
padding and trim a border of processing artifacts in one step. A crop that
silently differs from the pad shifts the content of every tile, so check
[`TilingParams::is_exact_inverse`] when you expect a faithful reconstruction.

Error handling
--------------
All public functions return `rastile::Result<T>`; match on `rastile::Error`
for `InvalidDimension`, `EmptyResult`, `ShapeMismatch`, or raster I/O errors.

Useful modules
--------------
- [`api`] — file-level helpers and the per-tile pipeline.
- [`core`] — padding, tiling, stitching and resize primitives plus `TilingParams`.
- [`types`] — `Sample`, `TileShape`, `TileGrid`.
- [`io`] — GDAL and `image` backed loading, GeoTIFF writing.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::TilingParams;
pub use error::{Error, Result};
pub use types::{DEFAULT_TILE_SIZE, Sample, TileGrid, TileShape, grid_position, with_channel_axis};

// Primitives
pub use core::processing::padding::{reflect_index, reflect_pad};
pub use core::processing::resize::{DEFAULT_RESIZE_WIDTH, resize, resize_dimensions};
pub use core::processing::stitching::{assemble, assemble_tiles};
pub use core::processing::tiling::{TileSource, partition, partition_array};

// Raster I/O
pub use io::{RasterError, load_image, save_image, save_image_2d};

// High-level API re-exports
pub use api::{map_tiles, process_path_to_path, process_tiled, stitch_to_path, tile_path};

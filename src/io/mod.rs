//! I/O boundary: load a raster path into a channel-last array and write
//! arrays back to GeoTIFF. GDAL handles `.tif`/`.tiff`; every other
//! extension goes through the `image` crate's generic decoders.
use ndarray::{Array3, ArrayView2, ArrayView3};
use std::path::Path;
use tracing::info;

pub mod decode;
pub mod gdal;
pub mod writers;

pub use decode::decode_image;
pub use self::gdal::{GdalRasterReader, RasterError, RasterMetadata};

use crate::types::{Sample, with_channel_axis};

const GEOSPATIAL_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// True if `path` has a GeoTIFF extension (case-insensitive).
pub fn is_geospatial(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            GEOSPATIAL_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Load `path` as a `(rows, cols, channels)` array.
///
/// GeoTIFFs keep their native band count, bands reordered to the last axis.
pub fn load_image<T: Sample>(path: impl AsRef<Path>) -> Result<Array3<T>, RasterError> {
    let path = path.as_ref();
    let image = if is_geospatial(path) {
        GdalRasterReader::open(path)?.read_channel_last::<T>()?
    } else {
        decode_image::<T>(path)?
    };
    let (rows, cols, channels) = image.dim();
    info!(
        "Loaded {:?}: {}x{} with {} channel(s)",
        path, rows, cols, channels
    );
    Ok(image)
}

/// Save a channel-last array as an LZW-compressed GeoTIFF.
pub fn save_image<T: Sample>(
    image: ArrayView3<'_, T>,
    path: impl AsRef<Path>,
) -> Result<(), RasterError> {
    writers::tiff::write_tiff(path.as_ref(), image)?;
    Ok(())
}

/// Save a single-channel `(rows, cols)` array as a one-band GeoTIFF.
pub fn save_image_2d<T: Sample>(
    image: ArrayView2<'_, T>,
    path: impl AsRef<Path>,
) -> Result<(), RasterError> {
    save_image(with_channel_axis(image), path)
}

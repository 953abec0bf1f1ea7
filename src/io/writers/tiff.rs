use gdal::Dataset;
use gdal::DriverManager;
use gdal::raster::{Buffer, RasterCreationOptions};
use ndarray::{ArrayView3, Axis};
use std::path::Path;
use tracing::info;

use crate::io::gdal::RasterError;
use crate::types::Sample;

/// Write a channel-last array to an unreferenced, LZW-compressed GeoTIFF with
/// one band per channel.
pub fn write_tiff<T: Sample>(output: &Path, image: ArrayView3<'_, T>) -> Result<Dataset, RasterError> {
    let (rows, cols, bands) = image.dim();
    if bands == 0 {
        return Err(RasterError::UnsupportedFormat(
            "Cannot write an image with zero channels".into(),
        ));
    }

    info!(
        "Writing {}x{} GeoTIFF with {} band(s) to {:?}",
        rows, cols, bands, output
    );

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut options = RasterCreationOptions::new();
    options.set_name_value("COMPRESS", "LZW")?;
    let ds = driver.create_with_band_type_with_options::<T, _>(output, cols, rows, bands, &options)?;

    for idx in 0..bands {
        let data: Vec<T> = image.index_axis(Axis(2), idx).iter().copied().collect();
        let mut buf = Buffer::new((cols, rows), data);
        let mut band = ds.rasterband(idx + 1)?;
        band.write((0, 0), (cols, rows), &mut buf)?;
    }

    Ok(ds)
}

use gdal::Dataset;
use gdal::errors::GdalError as GdalCrateError;
use ndarray::{Array2, Array3, Axis};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::types::Sample;

/// Errors raised while reading or writing raster files
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2} samples")]
    DimensionMismatch(usize, usize, usize),
}

/// Size of a GDAL raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
}

/// Band reader for GDAL-supported rasters (GeoTIFF and friends).
/// Georeferencing is left untouched.
pub struct GdalRasterReader {
    pub dataset: Dataset,
    pub metadata: RasterMetadata,
}

impl GdalRasterReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(RasterError::UnsupportedFormat("No raster bands found".into()));
        }
        debug!(
            "Opened {:?}: {}x{} with {} band(s)",
            path.as_ref(),
            size_y,
            size_x,
            bands
        );
        Ok(GdalRasterReader {
            dataset,
            metadata: RasterMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
            },
        })
    }

    /// Read a single band (1-based index) as an ndarray of shape (height, width)
    pub fn read_band<T: Sample>(&self, index: usize) -> Result<Array2<T>, RasterError> {
        if index == 0 || index > self.metadata.bands {
            return Err(RasterError::UnsupportedFormat(format!(
                "Band index {} out of range",
                index
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<T>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        let len = data_vec.len();
        Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data_vec).map_err(
            |_| RasterError::DimensionMismatch(self.metadata.size_y, self.metadata.size_x, len),
        )
    }

    /// Read every band into a channel-last array of shape (height, width, bands)
    pub fn read_channel_last<T: Sample>(&self) -> Result<Array3<T>, RasterError> {
        let mut image = Array3::from_elem(
            (self.metadata.size_y, self.metadata.size_x, self.metadata.bands),
            T::default(),
        );
        for idx in 1..=self.metadata.bands {
            let band = self.read_band::<T>(idx)?;
            image.index_axis_mut(Axis(2), idx - 1).assign(&band);
        }
        Ok(image)
    }
}

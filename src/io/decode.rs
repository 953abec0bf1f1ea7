//! Generic (non-geospatial) image decoding through the `image` crate.
use image::DynamicImage;
use ndarray::Array3;
use std::path::Path;

use crate::io::gdal::RasterError;
use crate::types::Sample;

fn convert<S: Sample, T: Sample>(raw: Vec<S>) -> Vec<T> {
    raw.into_iter().map(|v| T::from_f32(v.to_f32())).collect()
}

/// Decode `path` into a `(height, width, channels)` array, keeping the file's
/// native channel layout (luma, luma+alpha, RGB or RGBA).
pub fn decode_image<T: Sample>(path: &Path) -> Result<Array3<T>, RasterError> {
    let img = image::open(path)?;
    dynamic_to_array(img)
}

pub(crate) fn dynamic_to_array<T: Sample>(img: DynamicImage) -> Result<Array3<T>, RasterError> {
    let (cols, rows) = (img.width() as usize, img.height() as usize);
    let channels = img.color().channel_count() as usize;

    let samples: Vec<T> = match img {
        DynamicImage::ImageLuma8(buf) => convert(buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => convert(buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => convert(buf.into_raw()),
        DynamicImage::ImageLumaA16(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgb16(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgba16(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgb32F(buf) => convert(buf.into_raw()),
        DynamicImage::ImageRgba32F(buf) => convert(buf.into_raw()),
        other => {
            return Err(RasterError::UnsupportedFormat(format!(
                "Unsupported color type {:?}",
                other.color()
            )));
        }
    };

    let len = samples.len();
    Array3::from_shape_vec((rows, cols, channels), samples)
        .map_err(|_| RasterError::DimensionMismatch(rows, cols, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn luma_decodes_to_single_channel() {
        let img = GrayImage::from_fn(3, 2, |x, y| Luma([(y * 3 + x) as u8]));
        let arr = dynamic_to_array::<u8>(DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(arr.dim(), (2, 3, 1));
        assert_eq!(arr[[1, 2, 0]], 5);
    }

    #[test]
    fn rgb_is_channel_last() {
        let img = RgbImage::from_fn(2, 2, |x, y| Rgb([x as u8, y as u8, 7]));
        let arr = dynamic_to_array::<f32>(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(arr.dim(), (2, 2, 3));
        assert_eq!(arr[[1, 0, 0]], 0.0);
        assert_eq!(arr[[1, 0, 1]], 1.0);
        assert_eq!(arr[[0, 1, 0]], 1.0);
        assert_eq!(arr[[0, 1, 2]], 7.0);
    }
}

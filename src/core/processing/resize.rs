use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array3, ArrayView3, Axis};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Sample;

/// Default output width in pixels.
pub const DEFAULT_RESIZE_WIDTH: usize = 512;

/// Output `(rows, cols)` when scaling an image of `rows x cols` to `target_width`
/// columns while keeping its aspect ratio. The height is floored.
pub fn resize_dimensions(rows: usize, cols: usize, target_width: usize) -> Result<(usize, usize)> {
    if target_width == 0 {
        return Err(Error::invalid_dimension("target_width", target_width));
    }
    if cols == 0 {
        return Err(Error::invalid_dimension("width", cols));
    }
    if rows == 0 {
        return Err(Error::invalid_dimension("height", rows));
    }
    // exact integer floor of rows * (target_width / cols)
    let target_height = rows * target_width / cols;
    if target_height == 0 {
        return Err(Error::invalid_dimension("target_height", target_height));
    }
    Ok((target_height, target_width))
}

/// Source taps `(index, weight)` for every destination pixel when shrinking
/// one axis from `src_len` to `dst_len` samples.
///
/// Destination pixel `j` covers source `[j * s, (j + 1) * s)` with
/// `s = src_len / dst_len`, and each source pixel is weighted by its overlap
/// with that interval divided by `s`. Positions are counted in units of
/// `1 / dst_len` source pixels so overlaps are exact integers.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let span = src_len as f64;
    (0..dst_len)
        .map(|j| {
            let lo = j * src_len;
            let hi = lo + src_len;
            (lo / dst_len..=(hi - 1) / dst_len)
                .map(|i| {
                    let overlap = hi.min((i + 1) * dst_len) - lo.max(i * dst_len);
                    (i, overlap as f64 / span)
                })
                .collect()
        })
        .collect()
}

/// Separable area averaging, accumulated in `f64`. Only valid when neither
/// axis grows.
fn shrink_area<T: Sample>(image: ArrayView3<'_, T>, (target_rows, target_cols): (usize, usize)) -> Array3<T> {
    let (rows, cols, channels) = image.dim();
    let col_taps = area_weights(cols, target_cols);
    let row_taps = area_weights(rows, target_rows);

    let mut horizontal = Array3::<f64>::zeros((rows, target_cols, channels));
    horizontal
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(r, mut out_row)| {
            let src_row = image.index_axis(Axis(0), r).mapv(|v| v.to_f64());
            for (j, taps) in col_taps.iter().enumerate() {
                let mut dst = out_row.index_axis_mut(Axis(0), j);
                for &(i, weight) in taps {
                    dst.scaled_add(weight, &src_row.index_axis(Axis(0), i));
                }
            }
        });

    let mut resized = Array3::from_elem((target_rows, target_cols, channels), T::default());
    resized
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(j, mut out_row)| {
            let mut acc = Array2::<f64>::zeros((target_cols, channels));
            for &(i, weight) in &row_taps[j] {
                acc.scaled_add(weight, &horizontal.index_axis(Axis(0), i));
            }
            out_row.zip_mut_with(&acc, |dst, &v| *dst = T::from_f64(v));
        });
    resized
}

fn resize_plane(
    resizer: &mut Resizer,
    options: &ResizeOptions,
    plane: Vec<f32>,
    (rows, cols): (usize, usize),
    (target_rows, target_cols): (usize, usize),
) -> Result<Vec<f32>> {
    let mut src_bytes = Vec::with_capacity(plane.len() * 4);
    for v in plane {
        src_bytes.extend_from_slice(&v.to_ne_bytes());
    }

    let src_image =
        Image::from_vec_u8(cols as u32, rows as u32, src_bytes, PixelType::F32).map_err(Error::resize)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, PixelType::F32);
    resizer
        .resize(&src_image, &mut dst_image, options)
        .map_err(Error::resize)?;

    let dst_bytes = dst_image.into_vec();
    let mut out = Vec::with_capacity(dst_bytes.len() / 4);
    for chunk in dst_bytes.chunks_exact(4) {
        out.push(f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(out)
}

/// Bilinear enlargement through `fast_image_resize`, one `f32` plane per channel.
fn enlarge_bilinear<T: Sample>(
    image: ArrayView3<'_, T>,
    (target_rows, target_cols): (usize, usize),
) -> Result<Array3<T>> {
    let (rows, cols, channels) = image.dim();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();

    let mut resized = Array3::from_elem((target_rows, target_cols, channels), T::default());
    for ch in 0..channels {
        let plane: Vec<f32> = image.index_axis(Axis(2), ch).iter().map(|v| v.to_f32()).collect();
        let scaled = resize_plane(
            &mut resizer,
            &options,
            plane,
            (rows, cols),
            (target_rows, target_cols),
        )?;
        for (dst, v) in resized.index_axis_mut(Axis(2), ch).iter_mut().zip(scaled) {
            *dst = T::from_f32(v);
        }
    }
    Ok(resized)
}

/// Scale `image` to `target_width` columns, preserving its aspect ratio.
///
/// When shrinking, every output pixel is the area-weighted average of the
/// source pixels it overlaps, partial overlaps included. Enlarging falls back
/// to bilinear interpolation. Channels are resized independently; integer
/// samples are rounded and saturated on the way back.
pub fn resize<T: Sample>(image: ArrayView3<'_, T>, target_width: usize) -> Result<Array3<T>> {
    let (rows, cols, channels) = image.dim();
    let (target_rows, target_cols) = resize_dimensions(rows, cols, target_width)?;

    info!(
        "Resizing {}x{} image to {}x{} ({} channels)",
        rows, cols, target_rows, target_cols, channels
    );

    if target_rows <= rows && target_cols <= cols {
        return Ok(shrink_area(image, (target_rows, target_cols)));
    }
    debug!("Upscaling from width {} to {}", cols, target_cols);
    enlarge_bilinear(image, (target_rows, target_cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::with_channel_axis;
    use ndarray::Array2;

    #[test]
    fn height_is_floored() {
        let cases = [
            // (rows, cols, target_width, expected_rows)
            (1024, 1024, 512, 512),
            (600, 800, 512, 384),
            (3, 10, 7, 2),
            (1000, 3, 2, 666),
            (480, 640, 100, 75),
            (333, 1000, 512, 170),
        ];
        for (rows, cols, width, expected) in cases {
            assert_eq!(
                resize_dimensions(rows, cols, width).unwrap(),
                (expected, width),
                "{rows}x{cols} -> width {width}"
            );
        }
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(matches!(
            resize_dimensions(10, 10, 0),
            Err(Error::InvalidDimension { name: "target_width", .. })
        ));
        assert!(matches!(
            resize_dimensions(10, 0, 5),
            Err(Error::InvalidDimension { name: "width", .. })
        ));
        assert!(matches!(
            resize_dimensions(1, 100, 10),
            Err(Error::InvalidDimension { name: "target_height", .. })
        ));
    }

    #[test]
    fn resize_keeps_channels_and_shape() {
        let image = Array3::<u8>::from_elem((60, 80, 3), 200);
        let resized = resize(image.view(), 40).unwrap();
        assert_eq!(resized.dim(), (30, 40, 3));
        assert!(resized.iter().all(|&v| v == 200));
    }

    #[test]
    fn halving_averages_blocks() {
        // 2x2 blocks of distinct constants average to the constant
        let image = Array2::from_shape_fn((4, 4), |(r, c)| ((r / 2) * 2 + c / 2) as f32 * 10.0);
        let resized = resize(with_channel_axis(image.view()), 2).unwrap();
        assert_eq!(resized.dim(), (2, 2, 1));
        for r in 0..2 {
            for c in 0..2 {
                let expected = (r * 2 + c) as f32 * 10.0;
                assert!((resized[[r, c, 0]] - expected).abs() < 1e-3, "({r}, {c})");
            }
        }
    }

    #[test]
    fn area_average_of_checkerboard() {
        let image = Array2::from_shape_fn((8, 8), |(r, c)| if (r + c) % 2 == 0 { 0u16 } else { 1000 });
        let resized = resize(with_channel_axis(image.view()), 4).unwrap();
        assert_eq!(resized.dim(), (4, 4, 1));
        assert!(resized.iter().all(|&v| v == 500), "{resized:?}");
    }

    #[test]
    fn weights_split_straddling_pixels() {
        // 5 -> 2: the middle pixel is shared half and half
        let taps = area_weights(5, 2);
        assert_eq!(taps[0], vec![(0, 0.4), (1, 0.4), (2, 0.2)]);
        assert_eq!(taps[1], vec![(2, 0.2), (3, 0.4), (4, 0.4)]);
        for row in area_weights(7, 3) {
            let total: f64 = row.iter().map(|&(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn three_to_two_weights_partial_overlap() {
        let image = Array2::from_shape_fn((3, 3), |(_, c)| c as f32 * 30.0);
        let resized = resize(with_channel_axis(image.view()), 2).unwrap();
        assert_eq!(resized.dim(), (2, 2, 1));
        for r in 0..2 {
            assert!((resized[[r, 0, 0]] - 10.0).abs() < 1e-4, "{resized:?}");
            assert!((resized[[r, 1, 0]] - 50.0).abs() < 1e-4, "{resized:?}");
        }
    }

    #[test]
    fn five_to_two_weights_partial_overlap() {
        let image = Array2::from_shape_fn((5, 5), |(_, c)| (c * 10) as u8);
        let resized = resize(with_channel_axis(image.view()), 2).unwrap();
        assert_eq!(resized.dim(), (2, 2, 1));
        for r in 0..2 {
            assert_eq!(resized[[r, 0, 0]], 8);
            assert_eq!(resized[[r, 1, 0]], 32);
        }
    }

    #[test]
    fn wide_samples_keep_precision() {
        let big = 4_000_000_001u32;
        let image = Array2::from_shape_fn((2, 2), |(_, c)| big + 2 * c as u32);
        let resized = resize(with_channel_axis(image.view()), 1).unwrap();
        assert_eq!(resized[[0, 0, 0]], big + 1);

        let image = Array2::from_elem((4, 4), 1.0f64 + 1e-12);
        let resized = resize(with_channel_axis(image.view()), 2).unwrap();
        assert!(resized.iter().all(|&v| (v - (1.0 + 1e-12)).abs() < 1e-15));
    }

    #[test]
    fn enlarging_keeps_constant_planes() {
        let image = Array3::<u16>::from_elem((3, 4, 2), 700);
        let resized = resize(image.view(), 8).unwrap();
        assert_eq!(resized.dim(), (6, 8, 2));
        assert!(resized.iter().all(|&v| v == 700), "{resized:?}");
    }
}

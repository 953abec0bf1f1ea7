//! Shared types used across the crate.
//! Includes the `Sample` pixel trait, `TileShape`, and the `TileGrid`
//! produced by the tiler and consumed by the stitcher.
use gdal::raster::GdalType;
use ndarray::{Array4, ArrayView2, ArrayView3, ArrayView4, Axis};

use crate::error::{Error, Result};

/// Default tile height and width in pixels.
pub const DEFAULT_TILE_SIZE: usize = 512;

/// Numeric sample type stored in a pixel array.
///
/// Every sample type must be writable through GDAL. Conversions back from
/// floating point round to nearest and saturate for integer types. The area
/// resizer accumulates in `f64` so `u32`, `i32` and `f64` keep their precision.
pub trait Sample: Copy + Default + Send + Sync + GdalType + std::fmt::Debug + 'static {
    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }

                #[inline]
                fn from_f32(value: f32) -> Self {
                    // float -> int `as` casts saturate and map NaN to 0
                    value.round() as $t
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value.round() as $t
                }
            }
        )*
    };
}

impl_integer_sample!(u8, u16, i16, u32, i32);

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value as f64
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// View a single-channel `(rows, cols)` image as `(rows, cols, 1)` without copying.
pub fn with_channel_axis<T>(image: ArrayView2<'_, T>) -> ArrayView3<'_, T> {
    image.insert_axis(Axis(2))
}

/// Target height and width of every tile before padding.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct TileShape {
    rows: usize,
    cols: usize,
}

impl TileShape {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 {
            return Err(Error::invalid_dimension("tile_rows", rows));
        }
        if cols == 0 {
            return Err(Error::invalid_dimension("tile_cols", cols));
        }
        Ok(Self { rows, cols })
    }

    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)` after adding `pad` pixels on every side.
    pub fn padded(&self, pad: usize) -> Result<(usize, usize)> {
        pad.checked_mul(2)
            .and_then(|border| Some((self.rows.checked_add(border)?, self.cols.checked_add(border)?)))
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "padded tile size that fits in usize".to_string(),
                actual: format!("pad={} on {} tiles", pad, self),
            })
    }
}

impl Default for TileShape {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TILE_SIZE,
            cols: DEFAULT_TILE_SIZE,
        }
    }
}

impl std::fmt::Display for TileShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Map a flat row-major tile index to its `(row_band, col_band)` grid position.
#[inline]
pub fn grid_position(ndx: usize, grid_cols: usize) -> (usize, usize) {
    (ndx / grid_cols, ndx % grid_cols)
}

/// Tiles of shape `(num_tiles, rows, cols, channels)` in row-major grid order,
/// with the number of tiles along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid<T> {
    tiles: Array4<T>,
    grid_cols: usize,
    grid_rows: usize,
}

impl<T> TileGrid<T> {
    /// Wrap an existing tile array, e.g. tiles returned by per-tile processing.
    pub fn from_parts(tiles: Array4<T>, grid_cols: usize, grid_rows: usize) -> Result<Self> {
        let num_tiles = tiles.len_of(Axis(0));
        if grid_cols.checked_mul(grid_rows) != Some(num_tiles) {
            return Err(Error::ShapeMismatch {
                expected: format!("{}x{} grid of tiles", grid_rows, grid_cols),
                actual: format!("{} tiles", num_tiles),
            });
        }
        Ok(Self {
            tiles,
            grid_cols,
            grid_rows,
        })
    }

    pub fn tiles(&self) -> ArrayView4<'_, T> {
        self.tiles.view()
    }

    pub fn into_parts(self) -> (Array4<T>, usize, usize) {
        (self.tiles, self.grid_cols, self.grid_rows)
    }

    /// Tiles along the horizontal axis.
    pub fn grid_cols(&self) -> usize {
        self.grid_cols
    }

    /// Tiles along the vertical axis.
    pub fn grid_rows(&self) -> usize {
        self.grid_rows
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len_of(Axis(0))
    }

    /// Spatial `(rows, cols)` of each stored tile, padding included.
    pub fn tile_dims(&self) -> (usize, usize) {
        let (_, rows, cols, _) = self.tiles.dim();
        (rows, cols)
    }

    pub fn channels(&self) -> usize {
        self.tiles.len_of(Axis(3))
    }

    pub fn tile(&self, ndx: usize) -> ArrayView3<'_, T> {
        self.tiles.index_axis(Axis(0), ndx)
    }

    pub fn grid_position(&self, ndx: usize) -> (usize, usize) {
        grid_position(ndx, self.grid_cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array4};

    #[test]
    fn tile_shape_rejects_zero() {
        assert!(matches!(
            TileShape::new(0, 4),
            Err(Error::InvalidDimension { name: "tile_rows", value: 0 })
        ));
        assert!(matches!(
            TileShape::new(4, 0),
            Err(Error::InvalidDimension { name: "tile_cols", value: 0 })
        ));
        assert_eq!(TileShape::default(), TileShape::square(512).unwrap());
    }

    #[test]
    fn grid_position_is_row_major() {
        assert_eq!(grid_position(0, 3), (0, 0));
        assert_eq!(grid_position(2, 3), (0, 2));
        assert_eq!(grid_position(3, 3), (1, 0));
        assert_eq!(grid_position(7, 3), (2, 1));
    }

    #[test]
    fn from_parts_checks_tile_count() {
        let tiles = Array4::<u8>::zeros((5, 2, 2, 1));
        assert!(matches!(
            TileGrid::from_parts(tiles.clone(), 2, 2),
            Err(Error::ShapeMismatch { .. })
        ));
        let tiles = Array4::<u8>::zeros((6, 2, 3, 1));
        let grid = TileGrid::from_parts(tiles, 3, 2).unwrap();
        assert_eq!(grid.num_tiles(), 6);
        assert_eq!(grid.tile_dims(), (2, 3));
        assert_eq!(grid.channels(), 1);
        assert_eq!(grid.grid_position(4), (1, 1));
    }

    #[test]
    fn padded_size_overflow_is_an_error() {
        let shape = TileShape::new(4, 6).unwrap();
        assert_eq!(shape.padded(2).unwrap(), (8, 10));
        assert!(matches!(shape.padded(usize::MAX / 2), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(
            TileGrid::from_parts(Array4::<u8>::zeros((0, 1, 1, 1)), usize::MAX, 2),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn channel_axis_view_keeps_values() {
        let image = Array2::from_shape_fn((2, 3), |(r, c)| (r * 3 + c) as u16);
        let view = with_channel_axis(image.view());
        assert_eq!(view.dim(), (2, 3, 1));
        assert_eq!(view[[1, 2, 0]], 5);
    }

    #[test]
    fn f64_conversions_round_and_saturate() {
        assert_eq!(u8::from_f64(254.6), 255);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(i16::from_f64(-40000.0), i16::MIN);
        assert_eq!(u32::from_f64(4_000_000_001.0), 4_000_000_001);
        assert_eq!(i32::MAX.to_f64(), 2_147_483_647.0);
    }
}

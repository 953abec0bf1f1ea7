use ndarray::{Array3, ArrayView3, ArrayViewMut3, Axis};

/// Map a possibly out-of-range coordinate onto `0..len` by mirroring about the
/// first and last sample without repeating them (`[a b c]` pads as `c b | a b c | b a`).
///
/// Coordinates further out keep folding back and forth. An axis of length 1
/// repeats its only sample.
#[inline]
pub fn reflect_index(i: isize, len: usize) -> usize {
    debug_assert!(len > 0, "cannot reflect into an empty axis");
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m < len as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

/// Write `src` reflect-padded by `pad` pixels on each spatial side into `dst`.
///
/// `dst` must have shape `(rows + 2*pad, cols + 2*pad, channels)`. The channel
/// axis is copied as-is.
pub fn reflect_pad_into<T: Clone>(src: ArrayView3<'_, T>, pad: usize, mut dst: ArrayViewMut3<'_, T>) {
    let (rows, cols, channels) = src.dim();
    debug_assert_eq!(dst.dim(), (rows + 2 * pad, cols + 2 * pad, channels));
    if rows == 0 || cols == 0 {
        return;
    }

    let offset = pad as isize;
    let col_map: Vec<usize> = (0..cols + 2 * pad)
        .map(|c| reflect_index(c as isize - offset, cols))
        .collect();

    for (r, mut dst_row) in dst.outer_iter_mut().enumerate() {
        let src_row = src.index_axis(Axis(0), reflect_index(r as isize - offset, rows));
        for (mut dst_px, &c) in dst_row.outer_iter_mut().zip(&col_map) {
            dst_px.assign(&src_row.index_axis(Axis(0), c));
        }
    }
}

/// Reflect-pad a single tile, returning a new array.
pub fn reflect_pad<T: Clone + Default>(tile: ArrayView3<'_, T>, pad: usize) -> Array3<T> {
    let (rows, cols, channels) = tile.dim();
    let mut padded = Array3::from_elem((rows + 2 * pad, cols + 2 * pad, channels), T::default());
    reflect_pad_into(tile, pad, padded.view_mut());
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::with_channel_axis;
    use ndarray::{Array2, array};

    #[test]
    fn reflect_index_does_not_repeat_edge() {
        let mapped: Vec<usize> = (-2..5).map(|i| reflect_index(i, 3)).collect();
        assert_eq!(mapped, vec![2, 1, 0, 1, 2, 1, 0]);
    }

    #[test]
    fn reflect_index_folds_wide_pads() {
        // [1 2 3] padded by 5 -> [2 1 2 3 2 | 1 2 3 | 2 1 2 3 2]
        let values = [1, 2, 3];
        let padded: Vec<i32> = (-5..8).map(|i| values[reflect_index(i, 3)]).collect();
        assert_eq!(padded, vec![2, 1, 2, 3, 2, 1, 2, 3, 2, 1, 2, 3, 2]);
    }

    #[test]
    fn reflect_index_single_sample_repeats() {
        assert!((-3..4).all(|i| reflect_index(i, 1) == 0));
    }

    #[test]
    fn reflect_pad_matches_reference() {
        let tile: Array2<u8> = array![[1, 2, 3], [4, 5, 6], [7, 8, 9]];
        let padded = reflect_pad(with_channel_axis(tile.view()), 1);
        let expected: Array2<u8> = array![
            [5, 4, 5, 6, 5],
            [2, 1, 2, 3, 2],
            [5, 4, 5, 6, 5],
            [8, 7, 8, 9, 8],
            [5, 4, 5, 6, 5],
        ];
        assert_eq!(padded.index_axis(Axis(2), 0), expected);
    }

    #[test]
    fn reflect_pad_two_rows_by_two() {
        let tile: Array2<i16> = array![[1, 2, 3], [4, 5, 6]];
        let padded = reflect_pad(with_channel_axis(tile.view()), 2);
        let expected: Array2<i16> = array![
            [3, 2, 1, 2, 3, 2, 1],
            [6, 5, 4, 5, 6, 5, 4],
            [3, 2, 1, 2, 3, 2, 1],
            [6, 5, 4, 5, 6, 5, 4],
            [3, 2, 1, 2, 3, 2, 1],
            [6, 5, 4, 5, 6, 5, 4],
        ];
        assert_eq!(padded.index_axis(Axis(2), 0), expected);
    }

    #[test]
    fn reflect_pad_leaves_channels_alone() {
        let tile = Array3::from_shape_fn((2, 2, 3), |(r, c, ch)| (r * 100 + c * 10 + ch) as u16);
        let padded = reflect_pad(tile.view(), 1);
        assert_eq!(padded.dim(), (4, 4, 3));
        for ch in 0..3 {
            // corner mirrors the opposite interior pixel
            assert_eq!(padded[[0, 0, ch]], tile[[1, 1, ch]]);
            assert_eq!(padded[[1, 1, ch]], tile[[0, 0, ch]]);
            assert_eq!(padded[[3, 2, ch]], tile[[0, 1, ch]]);
        }
    }
}

//! Serial convolution over a rectangular range of tile cells.
//!
//! Cell ranges use the tile's halo-inclusive coordinates: interior rows are
//! `[1, rows]`, interior columns `[1, cols]`. The caller chooses the range;
//! the scheduler uses this to split each iteration into an interior pass
//! (no halo dependency) and four border strips (computed once halos have
//! arrived).

use std::ops::RangeInclusive;

use stencil_core::{PixelMode, TileBuffer};

use crate::filter::{Filter3x3, OverflowPolicy};

/// Convolves every cell of `rows x cols` (inclusive ranges) from `src`
/// into `dst`.
///
/// For each cell the 3x3 dot product with the filter is accumulated in
/// single precision over the source neighborhood and quantized to one byte
/// per channel. RGB channels are independent and share the coefficients.
/// Empty ranges are a no-op.
///
/// `src` and `dst` must share one shape; `src` is never written and `dst`
/// never read.
pub fn convolve_region(
    src: &TileBuffer,
    dst: &mut TileBuffer,
    rows: RangeInclusive<usize>,
    cols: RangeInclusive<usize>,
    filter: &Filter3x3,
    policy: OverflowPolicy,
) {
    debug_assert_eq!(src.stride(), dst.stride());
    debug_assert_eq!(src.rows(), dst.rows());

    let stride = dst.stride();
    for i in rows {
        let start = i * stride;
        let dst_row = &mut dst.as_bytes_mut()[start..start + stride];
        convolve_row(src, dst_row, i, cols.clone(), filter, policy);
    }
}

/// Convolves the cells `(i, j)` for `j` in `cols` into `dst_row`, the full
/// padded destination row `i`.
///
/// Shared by the serial and rayon drivers so both produce identical bytes.
pub(crate) fn convolve_row(
    src: &TileBuffer,
    dst_row: &mut [u8],
    i: usize,
    cols: RangeInclusive<usize>,
    filter: &Filter3x3,
    policy: OverflowPolicy,
) {
    let stride = src.stride();
    let bytes = src.as_bytes();
    let above = &bytes[(i - 1) * stride..i * stride];
    let center = &bytes[i * stride..(i + 1) * stride];
    let below = &bytes[(i + 1) * stride..(i + 2) * stride];
    let [h0, h1, h2] = *filter.rows();

    match src.mode() {
        PixelMode::Grey => {
            for j in cols {
                let b = j - 1;
                let acc = f32::from(above[b]) * h0[0]
                    + f32::from(above[b + 1]) * h0[1]
                    + f32::from(above[b + 2]) * h0[2]
                    + f32::from(center[b]) * h1[0]
                    + f32::from(center[b + 1]) * h1[1]
                    + f32::from(center[b + 2]) * h1[2]
                    + f32::from(below[b]) * h2[0]
                    + f32::from(below[b + 1]) * h2[1]
                    + f32::from(below[b + 2]) * h2[2];
                dst_row[j] = policy.quantize(acc);
            }
        }
        PixelMode::Rgb => {
            for j in cols {
                let b = (j - 1) * 3;
                for ch in 0..3 {
                    let acc = f32::from(above[b + ch]) * h0[0]
                        + f32::from(above[b + 3 + ch]) * h0[1]
                        + f32::from(above[b + 6 + ch]) * h0[2]
                        + f32::from(center[b + ch]) * h1[0]
                        + f32::from(center[b + 3 + ch]) * h1[1]
                        + f32::from(center[b + 6 + ch]) * h1[2]
                        + f32::from(below[b + ch]) * h2[0]
                        + f32::from(below[b + 3 + ch]) * h2[1]
                        + f32::from(below[b + 6 + ch]) * h2[2];
                    dst_row[j * 3 + ch] = policy.quantize(acc);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_interior(tile: &mut TileBuffer, value: u8) {
        for i in 1..=tile.rows() {
            tile.interior_row_mut(i).fill(value);
        }
    }

    #[test]
    fn test_box_blur_uniform_grey() {
        // 4x4 tile of 100 with zero halo: the single-worker whole-image case.
        let mut src = TileBuffer::new(4, 4, PixelMode::Grey).unwrap();
        let mut dst = TileBuffer::new(4, 4, PixelMode::Grey).unwrap();
        fill_interior(&mut src, 100);

        let filter = Filter3x3::box_blur();
        convolve_region(&src, &mut dst, 1..=4, 1..=4, &filter, OverflowPolicy::Clamp);

        // Corner sees 4 in-bounds neighbors, edge 6, interior all 9.
        let expected = [
            [44, 66, 66, 44],
            [66, 100, 100, 66],
            [66, 100, 100, 66],
            [44, 66, 66, 44],
        ];
        for (i, row) in expected.iter().enumerate() {
            assert_eq!(dst.interior_row(i + 1), row);
        }
    }

    #[test]
    fn test_gaussian_rgb_corner() {
        // 2x2 RGB tile of 200: each corner's in-bounds window carries
        // coefficients {4,2,2,1}/16, so every channel is trunc(112.5).
        let mut src = TileBuffer::new(2, 2, PixelMode::Rgb).unwrap();
        let mut dst = TileBuffer::new(2, 2, PixelMode::Rgb).unwrap();
        fill_interior(&mut src, 200);

        let filter = Filter3x3::gaussian();
        convolve_region(&src, &mut dst, 1..=2, 1..=2, &filter, OverflowPolicy::Clamp);

        for i in 1..=2 {
            assert_eq!(dst.interior_row(i), &[112u8; 6]);
        }
    }

    #[test]
    fn test_identity_reproduces_input() {
        let mut src = TileBuffer::new(3, 5, PixelMode::Grey).unwrap();
        let mut dst = TileBuffer::new(3, 5, PixelMode::Grey).unwrap();
        for i in 1..=3 {
            for (j, cell) in src.interior_row_mut(i).iter_mut().enumerate() {
                *cell = (i * 31 + j * 7) as u8;
            }
        }

        let filter = Filter3x3::identity();
        convolve_region(&src, &mut dst, 1..=3, 1..=5, &filter, OverflowPolicy::Clamp);

        for i in 1..=3 {
            assert_eq!(dst.interior_row(i), src.interior_row(i));
        }
    }

    #[test]
    fn test_empty_ranges_are_noop() {
        let src = TileBuffer::new(2, 2, PixelMode::Grey).unwrap();
        let mut dst = TileBuffer::new(2, 2, PixelMode::Grey).unwrap();
        let filter = Filter3x3::box_blur();
        // rows 2..=1 is the empty left-column strip of an r=2 tile.
        convolve_region(&src, &mut dst, 2..=1, 1..=1, &filter, OverflowPolicy::Clamp);
        assert!(dst.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reads_halo_when_populated() {
        // A populated west halo must contribute to column 1.
        let mut src = TileBuffer::new(1, 1, PixelMode::Grey).unwrap();
        let mut dst = TileBuffer::new(1, 1, PixelMode::Grey).unwrap();
        src.interior_row_mut(1)[0] = 90;
        let west = src.offset(1, 0);
        src.as_bytes_mut()[west] = 90;

        let filter = Filter3x3::box_blur();
        convolve_region(&src, &mut dst, 1..=1, 1..=1, &filter, OverflowPolicy::Clamp);

        // Two cells of 90 in the window: trunc(180/9) = 20.
        assert_eq!(dst.interior_row(1)[0], 20);
    }
}

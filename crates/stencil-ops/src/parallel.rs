//! Rayon fork/join over the kernel's outer row loop.
//!
//! Whole destination rows are distributed over the pool with a static
//! partition; threads share the read-only source tile and write disjoint
//! rows, so no synchronization is needed. Byte output is identical to
//! [`crate::convolve::convolve_region`].

use std::ops::RangeInclusive;

use rayon::prelude::*;
use stencil_core::TileBuffer;

use crate::convolve::convolve_row;
use crate::filter::{Filter3x3, OverflowPolicy};

/// Parallel variant of [`crate::convolve::convolve_region`].
///
/// The worker default: the serial version exists for reference and for
/// ranges too small to be worth forking.
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

    let (lo, hi) = (*rows.start(), *rows.end());
    if lo > hi {
        return;
    }
    let stride = dst.stride();
    let band = &mut dst.as_bytes_mut()[lo * stride..(hi + 1) * stride];
    band.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(k, dst_row)| {
            convolve_row(src, dst_row, lo + k, cols.clone(), filter, policy);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::PixelMode;

    fn patterned(rows: usize, cols: usize, mode: PixelMode) -> TileBuffer {
        let mut tile = TileBuffer::new(rows, cols, mode).unwrap();
        for i in 1..=rows {
            for (j, cell) in tile.interior_row_mut(i).iter_mut().enumerate() {
                *cell = (i * 131 + j * 37) as u8;
            }
        }
        tile
    }

    #[test]
    fn test_matches_serial_grey() {
        let src = patterned(16, 12, PixelMode::Grey);
        let filter = Filter3x3::gaussian();

        let mut serial = TileBuffer::new(16, 12, PixelMode::Grey).unwrap();
        crate::convolve::convolve_region(
            &src,
            &mut serial,
            1..=16,
            1..=12,
            &filter,
            OverflowPolicy::Clamp,
        );

        let mut par = TileBuffer::new(16, 12, PixelMode::Grey).unwrap();
        convolve_region(&src, &mut par, 1..=16, 1..=12, &filter, OverflowPolicy::Clamp);

        assert_eq!(serial.as_bytes(), par.as_bytes());
    }

    #[test]
    fn test_matches_serial_rgb_strip() {
        let src = patterned(9, 7, PixelMode::Rgb);
        let filter = Filter3x3::edge_detect();

        // A single-column strip, the shape the border pass uses.
        let mut serial = TileBuffer::new(9, 7, PixelMode::Rgb).unwrap();
        crate::convolve::convolve_region(
            &src,
            &mut serial,
            2..=8,
            7..=7,
            &filter,
            OverflowPolicy::Clamp,
        );

        let mut par = TileBuffer::new(9, 7, PixelMode::Rgb).unwrap();
        convolve_region(&src, &mut par, 2..=8, 7..=7, &filter, OverflowPolicy::Clamp);

        assert_eq!(serial.as_bytes(), par.as_bytes());
    }

    #[test]
    fn test_empty_range_is_noop() {
        let src = patterned(2, 2, PixelMode::Grey);
        let mut dst = TileBuffer::new(2, 2, PixelMode::Grey).unwrap();
        let filter = Filter3x3::box_blur();
        convolve_region(&src, &mut dst, 2..=1, 1..=2, &filter, OverflowPolicy::Clamp);
        assert!(dst.as_bytes().iter().all(|&b| b == 0));
    }
}

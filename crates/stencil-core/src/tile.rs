//! Halo-padded tile storage and the double-buffer pair.
//!
//! A tile stores its `rows x cols` interior plus a one-pixel halo ring on
//! every side, so the allocation is `(rows + 2) x (cols + 2)` pixels.
//! Storage is row-major packed bytes with no alignment padding; the row
//! stride in bytes is `(cols + 2) * bytes_per_pixel`.
//!
//! ```text
//!        0   1  ..  cols cols+1
//!      ┌───┬─────────────┬───┐
//!    0 │ ∘ │    halo     │ ∘ │
//!      ├───┼─────────────┼───┤
//!    1 │   │             │   │
//!   .. │ h │  interior   │ h │
//! rows │   │             │   │
//!      ├───┼─────────────┼───┤
//! rows+1 ∘ │    halo     │ ∘ │
//!      └───┴─────────────┴───┘
//! ```
//!
//! Halo cells are zero-initialized and stay zero on sides with no neighbor;
//! that is the Dirichlet boundary condition of the filter. Buffers are
//! allocated once at startup and never reallocate.

use crate::error::{Error, Result};
use crate::pixel::PixelMode;

/// A tile's pixel storage, halo included.
///
/// Interior cells use one-based indices `i in [1, rows]`, `j in [1, cols]`;
/// index 0 and `rows + 1` / `cols + 1` address the halo ring. This matches
/// the addressing used by the kernel and the halo exchange throughout.
#[derive(Debug, Clone)]
pub struct TileBuffer {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
    mode: PixelMode,
}

impl TileBuffer {
    /// Allocates a zero-initialized buffer for a `rows x cols` interior.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the allocation cannot be satisfied.
    pub fn new(rows: usize, cols: usize, mode: PixelMode) -> Result<Self> {
        let len = (rows + 2) * (cols + 2) * mode.bytes_per_pixel();
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory { requested: len })?;
        data.resize(len, 0);
        Ok(Self {
            data,
            rows,
            cols,
            mode,
        })
    }

    /// Interior height in pixels.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Interior width in pixels.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Pixel layout of the tile.
    #[inline]
    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    /// Row stride in bytes: `(cols + 2) * bytes_per_pixel`.
    #[inline]
    pub fn stride(&self) -> usize {
        self.mode.row_bytes(self.cols + 2)
    }

    /// Byte offset of cell `(i, j)` (halo-inclusive coordinates).
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        i * self.stride() + j * self.mode.bytes_per_pixel()
    }

    /// Whole storage as bytes, halo included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whole storage as mutable bytes, halo included.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The `cols` interior pixels of interior row `i in [1, rows]`.
    #[inline]
    pub fn interior_row(&self, i: usize) -> &[u8] {
        debug_assert!((1..=self.rows).contains(&i));
        let start = self.offset(i, 1);
        &self.data[start..start + self.mode.row_bytes(self.cols)]
    }

    /// Mutable view of the `cols` interior pixels of interior row `i`.
    #[inline]
    pub fn interior_row_mut(&mut self, i: usize) -> &mut [u8] {
        debug_assert!((1..=self.rows).contains(&i));
        let start = self.offset(i, 1);
        let len = self.mode.row_bytes(self.cols);
        &mut self.data[start..start + len]
    }
}

/// The src/dst double buffer owned by one worker.
///
/// The kernel reads `src` and writes `dst`; [`swap`](BufferPair::swap)
/// flips which buffer is which without copying. Both buffers share one
/// shape, fixed at construction.
#[derive(Debug)]
pub struct BufferPair {
    buffers: [TileBuffer; 2],
    front: usize,
}

impl BufferPair {
    /// Allocates both buffers, zero-initialized.
    pub fn new(rows: usize, cols: usize, mode: PixelMode) -> Result<Self> {
        Ok(Self {
            buffers: [
                TileBuffer::new(rows, cols, mode)?,
                TileBuffer::new(rows, cols, mode)?,
            ],
            front: 0,
        })
    }

    /// The buffer the kernel reads this iteration.
    #[inline]
    pub fn src(&self) -> &TileBuffer {
        &self.buffers[self.front]
    }

    /// Mutable access to `src`, for loading pixels and scattering halos.
    #[inline]
    pub fn src_mut(&mut self) -> &mut TileBuffer {
        &mut self.buffers[self.front]
    }

    /// Split borrow: `src` shared, `dst` exclusive, for the kernel.
    #[inline]
    pub fn src_dst(&mut self) -> (&TileBuffer, &mut TileBuffer) {
        let (left, right) = self.buffers.split_at_mut(1);
        if self.front == 0 {
            (&left[0], &mut right[0])
        } else {
            (&right[0], &mut left[0])
        }
    }

    /// Swaps src and dst. The last act of every iteration.
    #[inline]
    pub fn swap(&mut self) {
        self.front ^= 1;
    }
}

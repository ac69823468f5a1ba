//! Strided byte-region descriptors.
//!
//! An edge or corner of a tile is described as data, not code: `count`
//! blocks of `blocklen` bytes, consecutive blocks `stride` bytes apart.
//! Row edges and corners are a single contiguous block; column edges are a
//! strided vector of one pixel per tile row. The transport moves only
//! contiguous packets, so [`Region::gather`] packs the described bytes
//! into a scratch buffer at post time and [`Region::scatter`] writes a
//! received packet back out through the same shape.

use stencil_core::{Error, Result};

/// A strided region of a tile's byte storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Byte offset of the first block.
    pub offset: usize,
    /// Number of blocks.
    pub count: usize,
    /// Bytes per block.
    pub blocklen: usize,
    /// Byte distance between consecutive block starts.
    pub stride: usize,
}

impl Region {
    /// A single contiguous run of `len` bytes.
    #[inline]
    pub const fn contiguous(offset: usize, len: usize) -> Self {
        Self {
            offset,
            count: 1,
            blocklen: len,
            stride: 0,
        }
    }

    /// `count` blocks of `blocklen` bytes, `stride` bytes apart.
    #[inline]
    pub const fn vector(offset: usize, count: usize, blocklen: usize, stride: usize) -> Self {
        Self {
            offset,
            count,
            blocklen,
            stride,
        }
    }

    /// Total bytes described.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count * self.blocklen
    }

    /// Whether the region describes no bytes at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Packs the described bytes of `src` into a fresh contiguous buffer.
    pub fn gather(&self, src: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for block in 0..self.count {
            let start = self.offset + block * self.stride;
            out.extend_from_slice(&src[start..start + self.blocklen]);
        }
        out
    }

    /// Unpacks a contiguous packet back into the described bytes of `dst`.
    ///
    /// # Errors
    ///
    /// [`Error::Comm`] if the packet length does not match the region.
    pub fn scatter(&self, data: &[u8], dst: &mut [u8]) -> Result<()> {
        if data.len() != self.len() {
            return Err(Error::comm(format!(
                "halo packet of {} bytes does not fit region of {} bytes",
                data.len(),
                self.len()
            )));
        }
        for (block, chunk) in data.chunks_exact(self.blocklen).enumerate() {
            let start = self.offset + block * self.stride;
            dst[start..start + self.blocklen].copy_from_slice(chunk);
        }
        Ok(())
    }
}

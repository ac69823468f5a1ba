//! Per-row seek reads and writes of one worker's tile.
//!
//! Tile row `i` (one-based interior) lives at file offset
//! `((row0 + i - 1) * image_width + col0) * bytes_per_pixel` and spans
//! `cols * bytes_per_pixel` bytes. Reads land in the tile's interior rows,
//! leaving the halo ring untouched (zero); writes mirror the same offsets.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use stencil_core::{Result, TileBuffer, TileGeometry};

/// Output path for an input image: `blur_<basename>` in the current
/// working directory.
pub fn output_path(input: &Path) -> PathBuf {
    let basename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("blur_{basename}"))
}

/// Reads the tile's sub-rectangle of `path` into the interior of `tile`.
///
/// # Errors
///
/// [`stencil_core::Error::Io`] on open, seek or short-read failure.
pub fn read_tile(
    path: &Path,
    geometry: &TileGeometry,
    image_width: usize,
    tile: &mut TileBuffer,
) -> Result<()> {
    debug_assert_eq!(geometry.rows, tile.rows());
    debug_assert_eq!(geometry.cols, tile.cols());

    let bpp = tile.mode().bytes_per_pixel();
    let mut file = File::open(path)?;
    for i in 1..=geometry.rows {
        let pixel = (geometry.row0 + i - 1) * image_width + geometry.col0;
        file.seek(SeekFrom::Start((pixel * bpp) as u64))?;
        file.read_exact(tile.interior_row_mut(i))?;
    }
    debug!(rank = geometry.rank, rows = geometry.rows, "tile read");
    Ok(())
}

/// Creates (or truncates) the output file and presizes it to `len` bytes.
///
/// Called by rank 0 before any worker writes, so every later seek-write
/// lands inside an existing file.
pub fn create_output(path: &Path, len: u64) -> Result<()> {
    let file = File::create(path)?;
    file.set_len(len)?;
    Ok(())
}

/// Writes the interior of `tile` back to its sub-rectangle of `path`.
///
/// The file must already exist at full size (see [`create_output`]);
/// workers touch disjoint byte ranges, so no locking is involved.
pub fn write_tile(
    path: &Path,
    geometry: &TileGeometry,
    image_width: usize,
    tile: &TileBuffer,
) -> Result<()> {
    debug_assert_eq!(geometry.rows, tile.rows());
    debug_assert_eq!(geometry.cols, tile.cols());

    let bpp = tile.mode().bytes_per_pixel();
    let mut file = OpenOptions::new().write(true).open(path)?;
    for i in 1..=geometry.rows {
        let pixel = (geometry.row0 + i - 1) * image_width + geometry.col0;
        file.seek(SeekFrom::Start((pixel * bpp) as u64))?;
        file.write_all(tile.interior_row(i))?;
    }
    debug!(rank = geometry.rank, rows = geometry.rows, "tile written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::{PixelMode, ProcessGrid};

    #[test]
    fn test_output_path_uses_basename() {
        let path = output_path(Path::new("/some/dir/waterfall.raw"));
        assert_eq!(path, PathBuf::from("blur_waterfall.raw"));
    }

    #[test]
    fn test_read_tile_lands_in_interior() {
        // 4x4 grey image, bytes 0..16; rank 3 of a 2x2 grid owns the
        // bottom-right 2x2 block: [10, 11, 14, 15].
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("img.raw");
        std::fs::write(&input, (0u8..16).collect::<Vec<_>>()).unwrap();

        let grid = ProcessGrid::plan(4, 4, 4).unwrap();
        let geometry = grid.tile(3);
        let mut tile = TileBuffer::new(2, 2, PixelMode::Grey).unwrap();
        read_tile(&input, &geometry, 4, &mut tile).unwrap();

        assert_eq!(tile.interior_row(1), &[10, 11]);
        assert_eq!(tile.interior_row(2), &[14, 15]);
        // Halo untouched.
        assert_eq!(tile.as_bytes()[0], 0);
    }

    #[test]
    fn test_read_short_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("img.raw");
        std::fs::write(&input, [0u8; 8]).unwrap();

        let grid = ProcessGrid::plan(4, 4, 1).unwrap();
        let geometry = grid.tile(0);
        let mut tile = TileBuffer::new(4, 4, PixelMode::Grey).unwrap();
        assert!(read_tile(&input, &geometry, 4, &mut tile).is_err());
    }

    #[test]
    fn test_write_tiles_reassemble_image() {
        // Two workers side by side write disjoint columns of a 2x4 rgb image.
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.raw");
        let grid = ProcessGrid::plan(2, 4, 2).unwrap();
        create_output(&output, 2 * 4 * 3).unwrap();

        for rank in 0..2 {
            let geometry = grid.tile(rank);
            let mut tile = TileBuffer::new(2, 2, PixelMode::Rgb).unwrap();
            for i in 1..=2 {
                for (j, byte) in tile.interior_row_mut(i).iter_mut().enumerate() {
                    *byte = (100 * rank + 10 * i + j) as u8;
                }
            }
            write_tile(&output, &geometry, 4, &tile).unwrap();
        }

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(
            bytes,
            vec![
                10, 11, 12, 13, 14, 15, 110, 111, 112, 113, 114, 115, //
                20, 21, 22, 23, 24, 25, 120, 121, 122, 123, 124, 125,
            ]
        );
    }

    #[test]
    fn test_roundtrip_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("img.raw");
        let pixels: Vec<u8> = (0..36).map(|v| (v * 7) as u8).collect();
        std::fs::write(&input, &pixels).unwrap();

        let grid = ProcessGrid::plan(6, 6, 4).unwrap();
        let output = dir.path().join("copy.raw");
        create_output(&output, 36).unwrap();
        for rank in 0..4 {
            let geometry = grid.tile(rank);
            let mut tile = TileBuffer::new(3, 3, PixelMode::Grey).unwrap();
            read_tile(&input, &geometry, 6, &mut tile).unwrap();
            write_tile(&output, &geometry, 6, &tile).unwrap();
        }
        assert_eq!(std::fs::read(&output).unwrap(), pixels);
    }
}

//! Process grid, tile planning and neighbor topology.
//!
//! Workers are arranged in a row-major `P_r x P_c` grid over the image.
//! The planner picks the factorization of the worker count that minimizes
//! the tile half-perimeter `H/P_r + W/P_c` - the amount of halo data each
//! worker must exchange per iteration - subject to exact divisibility of
//! both image dimensions.
//!
//! # Coordinate System
//!
//! Grid coordinates follow the image convention: row 0 is the top of the
//! image, column 0 is the left edge. Rank 0 owns the top-left tile.
//!
//! ```text
//! rank = row * P_c + col
//!
//!        col 0   col 1   col 2
//!       ┌───────┬───────┬───────┐
//! row 0 │   0   │   1   │   2   │
//!       ├───────┼───────┼───────┤
//! row 1 │   3   │   4   │   5   │
//!       └───────┴───────┴───────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use stencil_core::{Direction, ProcessGrid};
//!
//! let grid = ProcessGrid::plan(6, 6, 4).unwrap();
//! assert_eq!((grid.rows(), grid.cols()), (2, 2));
//!
//! // Rank 0 sits in the top-left corner: three neighbors.
//! let present = grid.neighbors(0).iter().filter(|n| n.is_some()).count();
//! assert_eq!(present, 3);
//! assert_eq!(grid.neighbor(0, Direction::SouthEast), Some(3));
//! ```

use crate::error::{Error, Result};

/// The eight halo-exchange directions, in canonical order.
///
/// Edges first, then corners. `as usize` yields a stable index into
/// per-direction tables (neighbor arrays, tag tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Direction {
    /// Toward row - 1.
    North,
    /// Toward row + 1.
    South,
    /// Toward col - 1.
    West,
    /// Toward col + 1.
    East,
    /// Toward row - 1, col - 1.
    NorthWest,
    /// Toward row - 1, col + 1.
    NorthEast,
    /// Toward row + 1, col - 1.
    SouthWest,
    /// Toward row + 1, col + 1.
    SouthEast,
}

impl Direction {
    /// All eight directions in canonical order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// The direction pointing back at the sender.
    ///
    /// A halo sent north lands in the receiver's south halo, so tags and
    /// regions are always paired through `opposite`.
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// Grid offset `(d_row, d_col)` of this direction.
    #[inline]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthWest => (1, -1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// Returns `true` for the four diagonal (single-pixel corner) directions.
    #[inline]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Direction::NorthWest
                | Direction::NorthEast
                | Direction::SouthWest
                | Direction::SouthEast
        )
    }
}

/// A planned `P_r x P_c` worker grid over an `H x W` image.
///
/// Immutable once planned. Tile shape is uniform: every worker owns
/// `H/P_r` rows by `W/P_c` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGrid {
    height: usize,
    width: usize,
    grid_rows: usize,
    grid_cols: usize,
}

impl ProcessGrid {
    /// Plans the grid for an `height x width` image over `workers` workers.
    ///
    /// Enumerates every factorization `P_r * P_c = workers`, skips any that
    /// violates `P_r | height` or `P_c | width`, and keeps the one with the
    /// smallest tile half-perimeter `height/P_r + width/P_c`. Ties break to
    /// the smallest `P_r`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if any input is zero;
    /// [`Error::Indivisible`] if no valid factorization exists. Both are
    /// raised before any buffer allocation.
    pub fn plan(height: usize, width: usize, workers: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                "image dimensions must be > 0",
            ));
        }
        if workers == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                "worker count must be > 0",
            ));
        }

        let mut best: Option<(usize, usize)> = None; // (half_perimeter, grid_rows)
        for grid_rows in 1..=workers {
            if workers % grid_rows != 0 || height % grid_rows != 0 {
                continue;
            }
            let grid_cols = workers / grid_rows;
            if width % grid_cols != 0 {
                continue;
            }
            let half_perimeter = height / grid_rows + width / grid_cols;
            // Strict < keeps the first (smallest) grid_rows on ties.
            if best.is_none_or(|(min, _)| half_perimeter < min) {
                best = Some((half_perimeter, grid_rows));
            }
        }

        match best {
            Some((_, grid_rows)) => Ok(Self {
                height,
                width,
                grid_rows,
                grid_cols: workers / grid_rows,
            }),
            None => Err(Error::Indivisible {
                height,
                width,
                workers,
            }),
        }
    }

    /// Number of grid rows `P_r`.
    #[inline]
    pub fn rows(&self) -> usize {
        self.grid_rows
    }

    /// Number of grid columns `P_c`.
    #[inline]
    pub fn cols(&self) -> usize {
        self.grid_cols
    }

    /// Total worker count `P = P_r * P_c`.
    #[inline]
    pub fn workers(&self) -> usize {
        self.grid_rows * self.grid_cols
    }

    /// Image height this grid was planned for.
    #[inline]
    pub fn image_height(&self) -> usize {
        self.height
    }

    /// Image width this grid was planned for.
    #[inline]
    pub fn image_width(&self) -> usize {
        self.width
    }

    /// Grid coordinates `(row, col)` of a rank.
    #[inline]
    pub fn coords(&self, rank: usize) -> (usize, usize) {
        (rank / self.grid_cols, rank % self.grid_cols)
    }

    /// Neighbor rank in the given direction, or `None` at the grid edge.
    ///
    /// The grid is non-periodic: there is no wrap-around.
    pub fn neighbor(&self, rank: usize, dir: Direction) -> Option<usize> {
        let (row, col) = self.coords(rank);
        let (d_row, d_col) = dir.offset();
        let n_row = row as i64 + d_row;
        let n_col = col as i64 + d_col;
        if n_row < 0
            || n_col < 0
            || n_row >= self.grid_rows as i64
            || n_col >= self.grid_cols as i64
        {
            return None;
        }
        Some(n_row as usize * self.grid_cols + n_col as usize)
    }

    /// All eight neighbors of a rank, indexed by [`Direction::ALL`] order.
    pub fn neighbors(&self, rank: usize) -> [Option<usize>; 8] {
        let mut out = [None; 8];
        for (slot, dir) in out.iter_mut().zip(Direction::ALL) {
            *slot = self.neighbor(rank, dir);
        }
        out
    }

    /// The sub-rectangle of the global image owned by `rank`.
    pub fn tile(&self, rank: usize) -> TileGeometry {
        let (row, col) = self.coords(rank);
        let rows = self.height / self.grid_rows;
        let cols = self.width / self.grid_cols;
        TileGeometry {
            rank,
            rows,
            cols,
            row0: row * rows,
            col0: col * cols,
        }
    }
}

/// A worker's sub-rectangle of the global image.
///
/// The worker owns global rows `[row0, row0 + rows)` and columns
/// `[col0, col0 + cols)`. Halo padding is a storage concern and lives in
/// [`crate::tile::TileBuffer`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    /// Owning worker's rank.
    pub rank: usize,
    /// Tile height in pixels (`H / P_r`).
    pub rows: usize,
    /// Tile width in pixels (`W / P_c`).
    pub cols: usize,
    /// First global image row of the tile.
    pub row0: usize,
    /// First global image column of the tile.
    pub col0: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_minimizes_half_perimeter() {
        // 8x8 over 4 workers: candidates 1x4 (8+2=10), 2x2 (4+4=8), 4x1 (2+8=10).
        let grid = ProcessGrid::plan(8, 8, 4).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
    }

    #[test]
    fn test_plan_respects_divisibility() {
        // 6x4 over 4 workers: 2x2 divides both (3+2=5); 1x4 divides (6+1=7);
        // 4x1 rejected (6 % 4 != 0).
        let grid = ProcessGrid::plan(6, 4, 4).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
    }

    #[test]
    fn test_plan_tie_breaks_to_smallest_rows() {
        // 6x6 over 6 workers: 2x3 and 3x2 tie at half-perimeter 5;
        // the smaller row count wins.
        let grid = ProcessGrid::plan(6, 6, 6).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
    }

    #[test]
    fn test_plan_single_worker() {
        let grid = ProcessGrid::plan(4, 4, 1).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
        assert!(grid.neighbors(0).iter().all(|n| n.is_none()));
    }

    #[test]
    fn test_plan_indivisible() {
        let err = ProcessGrid::plan(10, 10, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::Indivisible {
                height: 10,
                width: 10,
                workers: 3
            }
        ));
    }

    #[test]
    fn test_plan_rejects_zero() {
        assert!(ProcessGrid::plan(0, 8, 2).is_err());
        assert!(ProcessGrid::plan(8, 8, 0).is_err());
    }

    #[test]
    fn test_coords_row_major() {
        let grid = ProcessGrid::plan(6, 6, 6).unwrap(); // 2x3
        assert_eq!(grid.coords(0), (0, 0));
        assert_eq!(grid.coords(2), (0, 2));
        assert_eq!(grid.coords(3), (1, 0));
        assert_eq!(grid.coords(5), (1, 2));
    }

    #[test]
    fn test_corner_tile_has_three_neighbors() {
        let grid = ProcessGrid::plan(6, 6, 9).unwrap(); // 3x3
        let neighbors = grid.neighbors(0);
        let present: Vec<usize> = neighbors.iter().flatten().copied().collect();
        assert_eq!(present.len(), 3);
        assert_eq!(grid.neighbor(0, Direction::South), Some(3));
        assert_eq!(grid.neighbor(0, Direction::East), Some(1));
        assert_eq!(grid.neighbor(0, Direction::SouthEast), Some(4));
        assert_eq!(grid.neighbor(0, Direction::North), None);
        assert_eq!(grid.neighbor(0, Direction::NorthWest), None);
    }

    #[test]
    fn test_center_tile_has_eight_neighbors() {
        let grid = ProcessGrid::plan(6, 6, 9).unwrap(); // 3x3
        let neighbors = grid.neighbors(4);
        assert!(neighbors.iter().all(|n| n.is_some()));
        assert_eq!(grid.neighbor(4, Direction::North), Some(1));
        assert_eq!(grid.neighbor(4, Direction::SouthWest), Some(6));
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_tile_geometry() {
        let grid = ProcessGrid::plan(6, 6, 4).unwrap(); // 2x2, 3x3 tiles
        let tile = grid.tile(3);
        assert_eq!(tile.rows, 3);
        assert_eq!(tile.cols, 3);
        assert_eq!(tile.row0, 3);
        assert_eq!(tile.col0, 3);
    }
}

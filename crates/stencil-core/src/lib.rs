//! # stencil-core
//!
//! Core types for tiled, iterated stencil filtering of raw raster images.
//!
//! This crate provides the foundational types used throughout the stencil-rs
//! workspace:
//!
//! - [`Error`], [`Result`] - Unified error handling
//! - [`PixelMode`] - Single-channel (grey) vs interleaved three-channel (rgb)
//! - [`ProcessGrid`] - 2-D worker grid with perimeter-minimizing planning
//! - [`TileGeometry`] - A worker's sub-rectangle of the global image
//! - [`Direction`] - The eight halo-exchange directions
//! - [`TileBuffer`], [`BufferPair`] - Halo-padded pixel storage with
//!   double-buffer swap
//!
//! ## Design Philosophy
//!
//! A worker owns exactly one tile of the image plus a one-pixel halo ring.
//! Everything a worker needs to know about its place in the world - its
//! sub-rectangle, its neighbors, its buffer shape - is decided once at
//! startup and immutable afterwards. The types here enforce that: a planned
//! [`ProcessGrid`] never changes, and a [`TileBuffer`] never reallocates.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of stencil-rs and has no internal
//! dependencies. All other stencil-rs crates depend on `stencil-core`:
//!
//! ```text
//! stencil-core (this crate)
//!    ^
//!    |
//!    +-- stencil-ops (3x3 convolution kernel)
//!    +-- stencil-comm (halo exchange, collectives)
//!    +-- stencil-io (raw tiled file I/O)
//!    +-- stencil-engine (iteration scheduler, job runner)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod grid;
pub mod pixel;
pub mod tile;

// Re-exports for convenience
pub use error::{Error, Result};
pub use grid::{Direction, ProcessGrid, TileGeometry};
pub use pixel::PixelMode;
pub use tile::{BufferPair, TileBuffer};

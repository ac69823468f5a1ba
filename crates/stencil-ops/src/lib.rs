//! # stencil-ops
//!
//! The 3x3 convolution kernel applied by every worker to its tile.
//!
//! # Modules
//!
//! - [`filter`] - The built-in 3x3 filter tables and the float-to-byte policy
//! - [`convolve`] - Serial convolution over a rectangular cell range
//! - [`parallel`] - Rayon fork/join over the outer row loop
//!
//! The kernel reads a halo-padded source tile and writes bytes into the
//! same cell range of an equally shaped destination tile. It never reads
//! the destination and never writes the source, so disjoint ranges can run
//! concurrently.
//!
//! # Example
//!
//! ```rust
//! use stencil_core::{PixelMode, TileBuffer};
//! use stencil_ops::{convolve_region, Filter3x3, OverflowPolicy};
//!
//! let src = TileBuffer::new(4, 4, PixelMode::Grey).unwrap();
//! let mut dst = TileBuffer::new(4, 4, PixelMode::Grey).unwrap();
//! let filter = Filter3x3::box_blur();
//! convolve_region(&src, &mut dst, 1..=4, 1..=4, &filter, OverflowPolicy::Clamp);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convolve;
pub mod filter;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use convolve::convolve_region;
pub use filter::{Filter3x3, FilterKind, OverflowPolicy};

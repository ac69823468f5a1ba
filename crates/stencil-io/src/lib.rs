//! # stencil-io
//!
//! Raw tiled image I/O.
//!
//! The image file is a headerless, row-major byte stream; width, height
//! and pixel mode come from outside. Every worker opens the file
//! independently and moves only its own sub-rectangle: one seek plus one
//! exact transfer per tile row. Ranges are disjoint by construction, so
//! concurrent workers need no coordination beyond rank 0 pre-sizing the
//! output.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod raw;

pub use raw::{create_output, output_path, read_tile, write_tile};

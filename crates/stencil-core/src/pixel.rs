//! Pixel layout of the raw image: single-channel grey or interleaved RGB.
//!
//! The input format carries no header; the layout is supplied externally
//! (on the command line) and fixes the bytes-per-pixel everywhere: buffer
//! strides, halo message sizes and file offsets.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Pixel layout of the raw image.
///
/// # Example
///
/// ```rust
/// use stencil_core::PixelMode;
///
/// let mode: PixelMode = "rgb".parse().unwrap();
/// assert_eq!(mode.bytes_per_pixel(), 3);
/// assert_eq!(PixelMode::Grey.row_bytes(640), 640);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// One byte per pixel.
    Grey,
    /// Three interleaved bytes per pixel (R, G, B).
    Rgb,
}

impl PixelMode {
    /// Bytes of storage per pixel: 1 for grey, 3 for RGB.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grey => 1,
            Self::Rgb => 3,
        }
    }

    /// Bytes occupied by `pixels` contiguous pixels.
    #[inline]
    pub const fn row_bytes(self, pixels: usize) -> usize {
        pixels * self.bytes_per_pixel()
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grey => write!(f, "grey"),
            Self::Rgb => write!(f, "rgb"),
        }
    }
}

impl FromStr for PixelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grey" => Ok(Self::Grey),
            "rgb" => Ok(Self::Rgb),
            other => Err(Error::bad_argument(format!(
                "unknown pixel mode `{other}`, expected rgb or grey"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelMode::Grey.bytes_per_pixel(), 1);
        assert_eq!(PixelMode::Rgb.bytes_per_pixel(), 3);
        assert_eq!(PixelMode::Rgb.row_bytes(100), 300);
    }

    #[test]
    fn test_parse() {
        assert_eq!("grey".parse::<PixelMode>().unwrap(), PixelMode::Grey);
        assert_eq!("rgb".parse::<PixelMode>().unwrap(), PixelMode::Rgb);
        assert!("gray".parse::<PixelMode>().is_err());
        assert!("RGB".parse::<PixelMode>().is_err());
    }
}

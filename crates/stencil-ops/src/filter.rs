//! The 3x3 filter tables and the float-to-byte quantization policy.
//!
//! Every built-in filter is a table of small integer taps normalized by the
//! tap sum, identical on every worker and every iteration.
//!
//! # Filters
//!
//! - [`Filter3x3::box_blur`] - `1/9 * all-ones`
//! - [`Filter3x3::gaussian`] - `1/16 * [[1,2,1],[2,4,2],[1,2,1]]`
//! - [`Filter3x3::edge_detect`] - `1/28 * [[1,4,1],[4,8,4],[1,4,1]]`
//! - [`Filter3x3::identity`] - passes pixels through unchanged

use std::fmt;
use std::str::FromStr;

use stencil_core::Error;

/// Which built-in filter to apply. Selected at runtime on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    /// Box blur, `1/9 * all-ones`.
    Box,
    /// Gaussian blur. The default.
    #[default]
    Gaussian,
    /// Edge detection.
    Edge,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => write!(f, "box"),
            Self::Gaussian => write!(f, "gaussian"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            "edge" => Ok(Self::Edge),
            other => Err(Error::bad_argument(format!(
                "unknown filter `{other}`, expected box, gaussian or edge"
            ))),
        }
    }
}

/// A 3x3 matrix of normalized single-precision coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter3x3 {
    coeffs: [[f32; 3]; 3],
}

impl Filter3x3 {
    /// Builds a filter from integer taps divided by `divisor`.
    pub fn from_taps(taps: [[u32; 3]; 3], divisor: f32) -> Self {
        let mut coeffs = [[0.0f32; 3]; 3];
        for (row, taps_row) in coeffs.iter_mut().zip(taps) {
            for (coeff, tap) in row.iter_mut().zip(taps_row) {
                *coeff = tap as f32 / divisor;
            }
        }
        Self { coeffs }
    }

    /// Box blur: `1/9 * all-ones`.
    pub fn box_blur() -> Self {
        Self::from_taps([[1, 1, 1], [1, 1, 1], [1, 1, 1]], 9.0)
    }

    /// Gaussian blur: `1/16 * [[1,2,1],[2,4,2],[1,2,1]]`.
    pub fn gaussian() -> Self {
        Self::from_taps([[1, 2, 1], [2, 4, 2], [1, 2, 1]], 16.0)
    }

    /// Edge detection: `1/28 * [[1,4,1],[4,8,4],[1,4,1]]`.
    pub fn edge_detect() -> Self {
        Self::from_taps([[1, 4, 1], [4, 8, 4], [1, 4, 1]], 28.0)
    }

    /// The identity filter: center tap 1, everything else 0.
    ///
    /// Applying it any number of times reproduces the input bytes exactly,
    /// which makes it the reference filter for equivalence testing.
    pub fn identity() -> Self {
        Self::from_taps([[0, 0, 0], [0, 1, 0], [0, 0, 0]], 1.0)
    }

    /// The three coefficient rows, top to bottom.
    #[inline]
    pub fn rows(&self) -> &[[f32; 3]; 3] {
        &self.coeffs
    }
}

impl From<FilterKind> for Filter3x3 {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Box => Self::box_blur(),
            FilterKind::Gaussian => Self::gaussian(),
            FilterKind::Edge => Self::edge_detect(),
        }
    }
}

/// What to do when the accumulated value leaves `[0, 255]`.
///
/// Every built-in filter is a normalized weighted average, so its output
/// can never leave the byte range and both policies agree byte-for-byte.
/// The policy exists for filters whose taps do not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverflowPolicy {
    /// Truncate toward zero, saturating at 0 and 255. The default.
    #[default]
    Clamp,
    /// Truncate toward zero, then keep the low byte.
    Wrap,
}

impl OverflowPolicy {
    /// Quantizes an accumulated value to one output byte.
    #[inline]
    pub fn quantize(self, value: f32) -> u8 {
        match self {
            // `as` truncates toward zero and saturates out of range.
            Self::Clamp => value as u8,
            Self::Wrap => value as i64 as u8,
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamp => write!(f, "clamp"),
            Self::Wrap => write!(f, "wrap"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(Self::Clamp),
            "wrap" => Ok(Self::Wrap),
            other => Err(Error::bad_argument(format!(
                "unknown overflow policy `{other}`, expected clamp or wrap"
            ))),
        }
    }
}

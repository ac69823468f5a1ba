//! Error types for stencil-rs operations.
//!
//! This module provides the unified error handling system for the whole
//! pipeline: grid planning, buffer allocation, file I/O and halo
//! communication.
//!
//! # Overview
//!
//! The [`Error`] enum covers every failure mode the job can hit:
//!
//! - **Configuration errors**: [`Indivisible`](Error::Indivisible),
//!   [`InvalidDimensions`](Error::InvalidDimensions)
//! - **Allocation errors**: [`OutOfMemory`](Error::OutOfMemory)
//! - **I/O errors**: [`Io`](Error::Io)
//! - **Communication errors**: [`Comm`](Error::Comm), [`Aborted`](Error::Aborted)
//!
//! Every error is fatal to the job; there is no local recovery. Pixels
//! outside the global image reading as zero is *not* an error - that is the
//! defined boundary condition.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or running a stencil job.
///
/// This enum uses [`thiserror`] for automatic [`std::error::Error`] and
/// [`std::fmt::Display`] implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// The image cannot be divided evenly across the requested workers.
    ///
    /// Returned by the tile planner when no factorization `P_r * P_c = P`
    /// exists with `P_r | height` and `P_c | width`. Raised before any
    /// buffer allocation.
    #[error("cannot divide {height}x{width} image across {workers} workers")]
    Indivisible {
        /// Image height in pixels
        height: usize,
        /// Image width in pixels
        width: usize,
        /// Requested worker count
        workers: usize,
    },

    /// A malformed argument value (pixel mode, filter name, policy name).
    #[error("invalid argument: {detail}")]
    BadArgument {
        /// What was wrong with the value
        detail: String,
    },

    /// Invalid image or job dimensions.
    ///
    /// Returned when width, height or worker count is zero, or when the
    /// image byte length would overflow `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Tile buffer allocation failed.
    #[error("Not enough memory: failed to allocate {requested} bytes")]
    OutOfMemory {
        /// Bytes requested
        requested: usize,
    },

    /// I/O error during image read or write.
    ///
    /// Wraps [`std::io::Error`]; short reads surface as
    /// [`std::io::ErrorKind::UnexpectedEof`].
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Halo exchange or collective communication failed.
    #[error("communication failure: {detail}")]
    Comm {
        /// What went wrong on the wire
        detail: String,
    },

    /// A peer worker failed and broadcast an abort.
    ///
    /// Secondary to whatever error the originating worker reported; the job
    /// runner prefers the root cause when both are present.
    #[error("aborted by worker {rank}")]
    Aborted {
        /// Rank of the worker that failed first
        rank: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BadArgument`] error.
    #[inline]
    pub fn bad_argument(detail: impl Into<String>) -> Self {
        Self::BadArgument {
            detail: detail.into(),
        }
    }

    /// Creates an [`Error::Comm`] error.
    #[inline]
    pub fn comm(detail: impl Into<String>) -> Self {
        Self::Comm {
            detail: detail.into(),
        }
    }

    /// Returns `true` if this is a configuration error (bad args or an
    /// indivisible grid).
    #[inline]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Indivisible { .. } | Self::InvalidDimensions { .. } | Self::BadArgument { .. }
        )
    }

    /// Returns `true` if this is a communication error.
    #[inline]
    pub fn is_comm_error(&self) -> bool {
        matches!(self, Self::Comm { .. } | Self::Aborted { .. })
    }

    /// Returns `true` if this error is a secondary abort notification
    /// rather than a root cause.
    #[inline]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indivisible_message() {
        let err = Error::Indivisible {
            height: 10,
            width: 10,
            workers: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("10x10"));
        assert!(msg.contains("3 workers"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_out_of_memory_wording() {
        let err = Error::OutOfMemory { requested: 1 << 40 };
        assert!(err.to_string().starts_with("Not enough memory"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_abort_is_secondary() {
        let abort = Error::Aborted { rank: 2 };
        assert!(abort.is_abort());
        assert!(abort.is_comm_error());
        assert!(!Error::comm("link closed").is_abort());
    }
}

//! Job configuration and the runner.
//!
//! [`run`] plans the process grid, wires the worker mesh, spawns one
//! scoped thread per tile and joins them all. Errors are fail-fast: the
//! first failing worker aborts its peers, and the runner reports the root
//! cause rather than the secondary abort notifications.

use std::path::PathBuf;

use tracing::info;

use stencil_comm::Router;
use stencil_core::{Error, PixelMode, ProcessGrid, Result};
use stencil_ops::{Filter3x3, OverflowPolicy};

use crate::worker;

/// Everything a job needs to run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Path to the raw input image.
    pub image: PathBuf,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Number of filter iterations.
    pub loops: usize,
    /// Pixel layout of the image.
    pub mode: PixelMode,
    /// The 3x3 filter to apply, identical every iteration.
    pub filter: Filter3x3,
    /// Float-to-byte policy for out-of-range accumulations.
    pub overflow: OverflowPolicy,
    /// Worker (tile) count.
    pub workers: usize,
    /// Whether to write the filtered image back out.
    pub write_output: bool,
    /// Output path override. `None` means `blur_<input-basename>` in the
    /// current working directory.
    pub output: Option<PathBuf>,
}

impl JobConfig {
    /// Total image byte length, overflow-checked.
    pub fn image_bytes(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(self.mode.bytes_per_pixel()))
            .filter(|&len| len > 0)
            .ok_or_else(|| {
                Error::invalid_dimensions(
                    self.width,
                    self.height,
                    "image byte length must be > 0 and not overflow",
                )
            })
    }
}

/// What the runner hands back.
#[derive(Debug, Clone, Copy)]
pub struct JobReport {
    /// Maximum per-worker elapsed seconds over the iterations - the
    /// critical-path wall time. I/O is excluded.
    pub max_elapsed: f64,
    /// Planned grid rows `P_r`.
    pub grid_rows: usize,
    /// Planned grid columns `P_c`.
    pub grid_cols: usize,
}

/// Runs a job to completion.
///
/// # Errors
///
/// Configuration errors surface before any buffer allocation; any worker
/// failure (I/O, allocation, communication) aborts the whole job.
pub fn run(config: &JobConfig) -> Result<JobReport> {
    config.image_bytes()?;
    let grid = ProcessGrid::plan(config.height, config.width, config.workers)?;
    info!(
        grid_rows = grid.rows(),
        grid_cols = grid.cols(),
        tile_rows = config.height / grid.rows(),
        tile_cols = config.width / grid.cols(),
        "planned process grid"
    );

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| stencil_io::output_path(&config.image));

    let endpoints = Router::connect(grid.workers());
    let mut results: Vec<Result<Option<f64>>> = Vec::new();
    std::thread::scope(|scope| {
        let handles: Vec<_> = endpoints
            .into_iter()
            .map(|endpoint| {
                let grid = &grid;
                let output = output.as_path();
                scope.spawn(move || worker::run(endpoint, grid, config, output))
            })
            .collect();
        results = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::comm("worker thread panicked")))
            })
            .collect();
    });

    let mut max_elapsed = None;
    let mut first_abort = None;
    for outcome in results {
        match outcome {
            Ok(Some(max)) => max_elapsed = Some(max),
            Ok(None) => {}
            Err(err) if err.is_abort() => {
                first_abort.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }
    if let Some(err) = first_abort {
        return Err(err);
    }

    let max_elapsed = max_elapsed.ok_or_else(|| Error::comm("missing timing report from rank 0"))?;
    Ok(JobReport {
        max_elapsed,
        grid_rows: grid.rows(),
        grid_cols: grid.cols(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JobConfig {
        JobConfig {
            image: PathBuf::from("img.raw"),
            width: 4,
            height: 4,
            loops: 1,
            mode: PixelMode::Grey,
            filter: Filter3x3::gaussian(),
            overflow: OverflowPolicy::Clamp,
            workers: 1,
            write_output: true,
            output: None,
        }
    }

    #[test]
    fn test_image_bytes() {
        let mut cfg = config();
        assert_eq!(cfg.image_bytes().unwrap(), 16);
        cfg.mode = PixelMode::Rgb;
        assert_eq!(cfg.image_bytes().unwrap(), 48);
        cfg.width = 0;
        assert!(cfg.image_bytes().is_err());
    }

    #[test]
    fn test_indivisible_grid_rejected_before_io() {
        // The input path does not exist; the planner must fail first.
        let mut cfg = config();
        cfg.width = 10;
        cfg.height = 10;
        cfg.workers = 3;
        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, Error::Indivisible { workers: 3, .. }));
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let err = run(&config()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

//! One worker's full lifecycle: read, iterate, write, report.
//!
//! A worker that fails broadcasts an abort before returning, so peers
//! blocked in a barrier or a halo wait fail fast instead of hanging. The
//! timed region covers the iterations only; both I/O phases sit outside
//! the clock.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use stencil_comm::{barrier, reduce_max_time, Endpoint};
use stencil_core::{BufferPair, ProcessGrid, Result};

use crate::job::JobConfig;
use crate::scheduler::run_iterations;

/// Runs one worker to completion. Returns the reduced maximum elapsed
/// seconds on rank 0, `None` elsewhere.
pub(crate) fn run(
    mut endpoint: Endpoint,
    grid: &ProcessGrid,
    config: &JobConfig,
    output: &Path,
) -> Result<Option<f64>> {
    let rank = endpoint.rank();
    let outcome = execute(&mut endpoint, grid, config, output);
    if let Err(err) = &outcome {
        warn!(rank, %err, "worker failed");
        endpoint.abort();
    }
    outcome
}

fn execute(
    endpoint: &mut Endpoint,
    grid: &ProcessGrid,
    config: &JobConfig,
    output: &Path,
) -> Result<Option<f64>> {
    let rank = endpoint.rank();
    let geometry = grid.tile(rank);
    let neighbors = grid.neighbors(rank);

    let mut pair = BufferPair::new(geometry.rows, geometry.cols, config.mode)?;
    stencil_io::read_tile(&config.image, &geometry, config.width, pair.src_mut())?;

    barrier(endpoint)?;
    let start = Instant::now();
    run_iterations(
        endpoint,
        &mut pair,
        &neighbors,
        &config.filter,
        config.overflow,
        config.loops,
    )?;
    let elapsed = start.elapsed().as_secs_f64();
    debug!(rank, elapsed, "iterations complete");

    if config.write_output {
        if rank == 0 {
            stencil_io::create_output(output, config.image_bytes()? as u64)?;
        }
        // Nobody seeks into the output before rank 0 has sized it.
        barrier(endpoint)?;
        stencil_io::write_tile(output, &geometry, config.width, pair.src())?;
    }

    reduce_max_time(endpoint, elapsed)
}

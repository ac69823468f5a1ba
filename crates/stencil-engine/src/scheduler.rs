//! The per-iteration overlap schedule.
//!
//! Each iteration walks a fixed state machine:
//!
//! ```text
//! POSTED ── interior compute ──► RECVS_WAITED ── border compute ──► SENDS_WAITED ── swap
//! ```
//!
//! 1. Post the halo exchange for every present neighbor.
//! 2. Convolve the strict interior - cells whose neighborhood never
//!    touches the halo - while the halos are in flight.
//! 3. Wait for all receives; the halo ring is now this iteration's.
//! 4. Convolve the four border strips that consume the fresh halo.
//! 5. Wait for all sends.
//! 6. Swap src and dst.
//!
//! The border is split into strips that never depend on a corner some
//! neighbor configuration lacks: full top and bottom rows, then the left
//! and right columns minus both end cells.

use tracing::trace;

use stencil_comm::{post_halo_exchange, Endpoint};
use stencil_core::{BufferPair, Result};
use stencil_ops::{parallel, Filter3x3, OverflowPolicy};

/// Runs `loops` filter iterations over the worker's tile.
pub(crate) fn run_iterations(
    endpoint: &mut Endpoint,
    pair: &mut BufferPair,
    neighbors: &[Option<usize>; 8],
    filter: &Filter3x3,
    policy: OverflowPolicy,
    loops: usize,
) -> Result<()> {
    let (rows, cols) = (pair.src().rows(), pair.src().cols());
    for iteration in 0..loops {
        trace!(iteration, "posting halo exchange");
        let (sends, recvs) = post_halo_exchange(endpoint, pair.src(), neighbors)?;

        // Interior overlaps with the exchange still in flight.
        if rows >= 3 && cols >= 3 {
            let (src, dst) = pair.src_dst();
            parallel::convolve_region(src, dst, 2..=rows - 1, 2..=cols - 1, filter, policy);
        }

        endpoint.wait_recvs(recvs, pair.src_mut().as_bytes_mut())?;

        {
            let (src, dst) = pair.src_dst();
            parallel::convolve_region(src, dst, 1..=1, 1..=cols, filter, policy);
            if rows >= 2 {
                parallel::convolve_region(src, dst, rows..=rows, 1..=cols, filter, policy);
            }
            if rows >= 3 {
                parallel::convolve_region(src, dst, 2..=rows - 1, 1..=1, filter, policy);
                if cols >= 2 {
                    parallel::convolve_region(src, dst, 2..=rows - 1, cols..=cols, filter, policy);
                }
            }
        }

        endpoint.wait_sends(sends)?;
        pair.swap();
    }
    Ok(())
}

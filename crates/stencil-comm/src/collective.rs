//! The two collectives the job needs, built over point-to-point packets.
//!
//! Both funnel through rank 0. With one worker they degenerate to no-ops,
//! which is exactly the sequential specialization.

use stencil_core::{Error, Result};

use crate::endpoint::Endpoint;
use crate::tag::{TAG_BARRIER, TAG_TIME};

/// Arrival-and-release barrier across all workers.
///
/// Non-root workers send an arrival to rank 0 and block on the release;
/// rank 0 collects every arrival, then releases everyone. A peer failure
/// while blocked surfaces as [`Error::Aborted`].
pub fn barrier(endpoint: &mut Endpoint) -> Result<()> {
    let workers = endpoint.workers();
    if endpoint.rank() == 0 {
        for peer in 1..workers {
            endpoint.recv_bytes(peer, TAG_BARRIER)?;
        }
        for peer in 1..workers {
            endpoint.isend(peer, TAG_BARRIER, Vec::new())?;
        }
    } else {
        endpoint.isend(0, TAG_BARRIER, Vec::new())?;
        endpoint.recv_bytes(0, TAG_BARRIER)?;
    }
    Ok(())
}

/// Reduces every worker's elapsed seconds to the maximum on rank 0.
///
/// Returns `Some(max)` on rank 0 - the critical-path wall time - and
/// `None` elsewhere.
pub fn reduce_max_time(endpoint: &mut Endpoint, elapsed: f64) -> Result<Option<f64>> {
    if endpoint.rank() == 0 {
        let mut max = elapsed;
        for peer in 1..endpoint.workers() {
            let bytes = endpoint.recv_bytes(peer, TAG_TIME)?;
            let raw: [u8; 8] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::comm("malformed timing packet"))?;
            max = max.max(f64::from_le_bytes(raw));
        }
        Ok(Some(max))
    } else {
        endpoint.isend(0, TAG_TIME, elapsed.to_le_bytes().to_vec())?;
        Ok(None)
    }
}

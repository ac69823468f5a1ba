//! Halo exchange: region construction and posting for the eight neighbors.
//!
//! Each present neighbor gets one send of the matching edge or corner of
//! the tile's *interior* and one pending receive into the matching halo
//! slab. Row edges are contiguous runs of `cols` pixels, column edges are
//! strided vectors of `rows` single pixels, corners are one pixel.
//!
//! ```text
//!             north row ──► neighbor's south halo
//!           ┌─────────────┐
//!  west col │  interior   │ east col
//!           └─────────────┘
//!             south row ──► neighbor's north halo
//! ```

use stencil_core::{Direction, Result, TileBuffer};

use crate::endpoint::{Endpoint, PendingRecv, SendHandle};
use crate::region::Region;
use crate::tag::{recv_tag, send_tag};

/// The interior edge/corner of `tile` that travels toward `dir`.
pub fn send_region(tile: &TileBuffer, dir: Direction) -> Region {
    let (rows, cols) = (tile.rows(), tile.cols());
    let bpp = tile.mode().bytes_per_pixel();
    match dir {
        Direction::North => Region::contiguous(tile.offset(1, 1), cols * bpp),
        Direction::South => Region::contiguous(tile.offset(rows, 1), cols * bpp),
        Direction::West => Region::vector(tile.offset(1, 1), rows, bpp, tile.stride()),
        Direction::East => Region::vector(tile.offset(1, cols), rows, bpp, tile.stride()),
        Direction::NorthWest => Region::contiguous(tile.offset(1, 1), bpp),
        Direction::NorthEast => Region::contiguous(tile.offset(1, cols), bpp),
        Direction::SouthWest => Region::contiguous(tile.offset(rows, 1), bpp),
        Direction::SouthEast => Region::contiguous(tile.offset(rows, cols), bpp),
    }
}

/// The halo slab of `tile` that the neighbor in `dir` fills.
pub fn recv_region(tile: &TileBuffer, dir: Direction) -> Region {
    let (rows, cols) = (tile.rows(), tile.cols());
    let bpp = tile.mode().bytes_per_pixel();
    match dir {
        Direction::North => Region::contiguous(tile.offset(0, 1), cols * bpp),
        Direction::South => Region::contiguous(tile.offset(rows + 1, 1), cols * bpp),
        Direction::West => Region::vector(tile.offset(1, 0), rows, bpp, tile.stride()),
        Direction::East => Region::vector(tile.offset(1, cols + 1), rows, bpp, tile.stride()),
        Direction::NorthWest => Region::contiguous(tile.offset(0, 0), bpp),
        Direction::NorthEast => Region::contiguous(tile.offset(0, cols + 1), bpp),
        Direction::SouthWest => Region::contiguous(tile.offset(rows + 1, 0), bpp),
        Direction::SouthEast => Region::contiguous(tile.offset(rows + 1, cols + 1), bpp),
    }
}

/// Posts the full halo exchange for one iteration.
///
/// For every present neighbor: gather and send the outgoing edge, register
/// the pending receive for the incoming halo. Returns the in-flight sends
/// and receives for the schedule's two wait-all steps. Absent neighbors
/// are skipped entirely; their halo slabs keep their zeros (the image
/// boundary condition).
pub fn post_halo_exchange(
    endpoint: &Endpoint,
    tile: &TileBuffer,
    neighbors: &[Option<usize>; 8],
) -> Result<(Vec<SendHandle>, Vec<PendingRecv>)> {
    let mut sends = Vec::with_capacity(8);
    let mut recvs = Vec::with_capacity(8);
    for (dir, peer) in Direction::ALL.into_iter().zip(neighbors) {
        let Some(peer) = *peer else { continue };
        let outgoing = send_region(tile, dir).gather(tile.as_bytes());
        sends.push(endpoint.isend(peer, send_tag(dir), outgoing)?);
        recvs.push(endpoint.irecv(peer, recv_tag(dir), recv_region(tile, dir)));
    }
    Ok((sends, recvs))
}

//! Per-worker mailboxes over an all-to-all channel mesh.
//!
//! [`Router::connect`] wires `P` endpoints together; each endpoint owns the
//! receiving side of its own unbounded channel and a sender handle to every
//! peer. Packets carry `(from, tag, bytes)`; delivery is per-sender FIFO.
//!
//! # Non-blocking contract
//!
//! [`Endpoint::isend`] packs already-gathered bytes into the peer's channel
//! and completes immediately - the transport owns the packet from then on,
//! so the source tile region needs no stability beyond the gather. The
//! returned [`SendHandle`] exists for the wait-all step of the iteration
//! schedule. [`Endpoint::irecv`] registers nothing with the transport; it
//! produces a [`PendingRecv`] descriptor that [`Endpoint::wait_recvs`]
//! later matches against arriving packets and scatters into the halo.
//!
//! A packet with no matching pending receive belongs to the *next*
//! iteration (a neighbor may run one iteration ahead, never more, because
//! it cannot post iteration t+1 sends before consuming our iteration t
//! edge). Such packets are stashed and matched on the following wait, which
//! keeps at most one early packet per `(sender, tag)`.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use stencil_core::{Error, Result};

use crate::region::Region;
use crate::tag::{Tag, TAG_ABORT};

/// One message on the mesh.
#[derive(Debug)]
struct Packet {
    from: usize,
    tag: Tag,
    bytes: Vec<u8>,
}

/// Builds the channel mesh connecting a job's workers.
pub struct Router;

impl Router {
    /// Creates `workers` endpoints wired all-to-all, one per rank.
    pub fn connect(workers: usize) -> Vec<Endpoint> {
        let (senders, inboxes): (Vec<_>, Vec<_>) =
            (0..workers).map(|_| unbounded::<Packet>()).unzip();
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| Endpoint {
                rank,
                links: senders.clone(),
                inbox,
                stash: Vec::new(),
            })
            .collect()
    }
}

/// Handle for a posted send.
///
/// Sends complete at post time on this transport; the handle keeps the
/// post/wait shape of the iteration schedule and identifies the message
/// for diagnostics.
#[derive(Debug)]
pub struct SendHandle {
    /// Destination rank.
    pub to: usize,
    /// Tag the message was sent under.
    pub tag: Tag,
}

/// A posted receive, waiting to be matched against an arriving packet.
#[derive(Debug)]
pub struct PendingRecv {
    /// Rank the packet must come from.
    pub from: usize,
    /// Tag the packet must carry.
    pub tag: Tag,
    /// Where the payload lands in the tile.
    pub region: Region,
}

/// A worker's connection to every peer.
pub struct Endpoint {
    rank: usize,
    links: Vec<Sender<Packet>>,
    inbox: Receiver<Packet>,
    stash: Vec<Packet>,
}

impl Endpoint {
    /// This worker's rank.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Total workers on the mesh.
    #[inline]
    pub fn workers(&self) -> usize {
        self.links.len()
    }

    /// Posts a non-blocking send of `bytes` to `to` under `tag`.
    ///
    /// # Errors
    ///
    /// [`Error::Comm`] if the destination does not exist or its channel is
    /// closed (the peer worker is gone).
    pub fn isend(&self, to: usize, tag: Tag, bytes: Vec<u8>) -> Result<SendHandle> {
        let link = self
            .links
            .get(to)
            .ok_or_else(|| Error::comm(format!("no such worker {to}")))?;
        link.send(Packet {
            from: self.rank,
            tag,
            bytes,
        })
        .map_err(|_| Error::comm(format!("link to worker {to} closed")))?;
        Ok(SendHandle { to, tag })
    }

    /// Posts a non-blocking receive: the halo region to fill when a packet
    /// from `from` under `tag` arrives.
    #[inline]
    pub fn irecv(&self, from: usize, tag: Tag, region: Region) -> PendingRecv {
        PendingRecv { from, tag, region }
    }

    /// Waits for every pending receive, scattering each payload into
    /// `buf` through its region.
    ///
    /// Unmatched arrivals are stashed for the next wait.
    ///
    /// # Errors
    ///
    /// [`Error::Aborted`] if a peer broadcast an abort; [`Error::Comm`] on
    /// a closed channel or a malformed payload.
    pub fn wait_recvs(&mut self, pending: Vec<PendingRecv>, buf: &mut [u8]) -> Result<()> {
        let mut outstanding = Vec::with_capacity(pending.len());
        for recv in pending {
            match self.take_stashed(recv.from, recv.tag) {
                Some(packet) => recv.region.scatter(&packet.bytes, buf)?,
                None => outstanding.push(recv),
            }
        }

        while !outstanding.is_empty() {
            let packet = self.next_packet()?;
            let matched = outstanding
                .iter()
                .position(|recv| recv.from == packet.from && recv.tag == packet.tag);
            match matched {
                Some(idx) => {
                    let recv = outstanding.swap_remove(idx);
                    recv.region.scatter(&packet.bytes, buf)?;
                }
                None => self.stash.push(packet),
            }
        }
        Ok(())
    }

    /// Waits for every posted send. Completion is immediate on this
    /// transport; the call is the schedule's send-wait-all suspension point.
    pub fn wait_sends(&mut self, handles: Vec<SendHandle>) -> Result<()> {
        drop(handles);
        Ok(())
    }

    /// Receives the payload of the packet from `from` under `tag`,
    /// blocking until it arrives. Building block for the collectives.
    pub fn recv_bytes(&mut self, from: usize, tag: Tag) -> Result<Vec<u8>> {
        if let Some(packet) = self.take_stashed(from, tag) {
            return Ok(packet.bytes);
        }
        loop {
            let packet = self.next_packet()?;
            if packet.from == from && packet.tag == tag {
                return Ok(packet.bytes);
            }
            self.stash.push(packet);
        }
    }

    /// Best-effort abort broadcast to every peer. Called by a failing
    /// worker so peers blocked in a wait fail fast instead of hanging.
    pub fn abort(&self) {
        debug!(rank = self.rank, "broadcasting abort");
        for (peer, link) in self.links.iter().enumerate() {
            if peer != self.rank {
                let _ = link.send(Packet {
                    from: self.rank,
                    tag: TAG_ABORT,
                    bytes: Vec::new(),
                });
            }
        }
    }

    fn take_stashed(&mut self, from: usize, tag: Tag) -> Option<Packet> {
        // FIFO per sender: the earliest stashed match is the right one.
        let idx = self
            .stash
            .iter()
            .position(|packet| packet.from == from && packet.tag == tag)?;
        Some(self.stash.remove(idx))
    }

    fn next_packet(&mut self) -> Result<Packet> {
        let packet = self
            .inbox
            .recv()
            .map_err(|_| Error::comm("all peer links closed"))?;
        if packet.tag == TAG_ABORT {
            return Err(Error::Aborted { rank: packet.from });
        }
        Ok(packet)
    }
}

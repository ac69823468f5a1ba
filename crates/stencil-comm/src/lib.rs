//! # stencil-comm
//!
//! Message passing between stencil workers: the halo-exchange protocol and
//! the two collectives the job needs (barrier, max-reduce).
//!
//! # Modules
//!
//! - [`tag`] - The eight-direction tag table and reserved collective tags
//! - [`region`] - Strided byte-region descriptors (gather/scatter)
//! - [`endpoint`] - Per-worker mailbox with non-blocking post and wait-all
//! - [`exchange`] - Halo send/recv region construction and posting
//! - [`collective`] - Barrier and elapsed-time max-reduce over the endpoints
//!
//! # Transport
//!
//! Workers are connected all-to-all by unbounded channels carrying owned
//! byte packets. Strided tile regions are packed into a contiguous scratch
//! buffer at post time and scattered back out at wait time, so a send
//! completes as soon as it is posted and the source tile stays borrowable
//! for the interior compute that overlaps the exchange. Receives stay
//! pending as plain descriptors until [`Endpoint::wait_recvs`] matches the
//! arrived packets against them.
//!
//! Matching is `(sender, tag)`; channels deliver per-sender FIFO, so a
//! packet that arrives before its receive is posted can only belong to the
//! next iteration and is stashed until then.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod collective;
pub mod endpoint;
pub mod exchange;
pub mod region;
pub mod tag;

pub use collective::{barrier, reduce_max_time};
pub use endpoint::{Endpoint, PendingRecv, Router, SendHandle};
pub use exchange::post_halo_exchange;
pub use region::Region;
pub use tag::{recv_tag, send_tag, Tag};

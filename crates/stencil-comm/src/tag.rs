//! Message tags: one per halo direction plus a few reserved values.
//!
//! Every direction owns a fixed tag. A worker receives *from* direction `d`
//! under `tag(d)`, and its neighbor in that direction sends under
//! `tag(opposite(d))` - the mirror-pair rule - so a pair of neighbors can
//! never self-match even if the topology were to fold. The concrete values
//! are arbitrary; only injectivity and the mirror rule matter.

use stencil_core::Direction;

/// Message tag carried by every packet.
pub type Tag = u32;

/// Elapsed-time reduction to rank 0.
pub const TAG_TIME: Tag = 0;
/// Barrier arrival and release packets.
pub const TAG_BARRIER: Tag = 1;
/// Broadcast by a failing worker so blocked peers fail fast.
pub const TAG_ABORT: Tag = 2;

const fn direction_tag(dir: Direction) -> Tag {
    match dir {
        Direction::North => 10,
        Direction::South => 11,
        Direction::West => 12,
        Direction::East => 13,
        Direction::NorthWest => 20,
        Direction::NorthEast => 21,
        Direction::SouthWest => 22,
        Direction::SouthEast => 23,
    }
}

/// Tag under which a worker receives the halo arriving from `dir`.
#[inline]
pub const fn recv_tag(dir: Direction) -> Tag {
    direction_tag(dir)
}

/// Tag under which a worker sends its edge toward `dir`.
///
/// `send_tag(d) == recv_tag(opposite(d))`: what goes out northward is the
/// receiver's south halo.
#[inline]
pub const fn send_tag(dir: Direction) -> Tag {
    direction_tag(dir.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_pair_rule() {
        for dir in Direction::ALL {
            assert_eq!(send_tag(dir), recv_tag(dir.opposite()));
        }
    }

    #[test]
    fn test_tags_injective() {
        let mut seen: Vec<Tag> = Direction::ALL.iter().map(|&d| recv_tag(d)).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_reserved_tags_distinct_from_halo_tags() {
        for dir in Direction::ALL {
            for reserved in [TAG_TIME, TAG_BARRIER, TAG_ABORT] {
                assert_ne!(recv_tag(dir), reserved);
            }
        }
    }
}

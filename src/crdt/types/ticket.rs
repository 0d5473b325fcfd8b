//! Logical timestamps identifying elements and operations.
//!
//! A [`Ticket`] is both the identity of an element (its creation ticket) and
//! the ordering key used when concurrent edits have to be placed.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::replica::{ActorId, INITIAL_ACTOR_ID, MAX_ACTOR_ID};

/// A lamport-based logical timestamp, unique across replicas.
///
/// # Ordering
///
/// Tickets are ordered by lamport value first, then by the issuing actor, and
/// finally by the delimiter that distinguishes tickets issued inside the same
/// change. Two distinct operations never share a ticket, so the order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// Logical clock value of the change that issued this ticket
    pub lamport: u64,
    /// Position of this ticket inside its change
    pub delimiter: u32,
    /// The replica that issued this ticket
    pub actor_id: ActorId,
}

impl Ticket {
    /// The smallest ticket. Owned by the head sentinel of every array.
    pub const INITIAL: Ticket = Ticket {
        lamport: 0,
        delimiter: 0,
        actor_id: INITIAL_ACTOR_ID,
    };

    /// The largest ticket; everything ever issued is before it.
    pub const MAX: Ticket = Ticket {
        lamport: u64::MAX,
        delimiter: u32::MAX,
        actor_id: MAX_ACTOR_ID,
    };

    pub fn new(lamport: u64, delimiter: u32, actor_id: ActorId) -> Self {
        Ticket {
            lamport,
            delimiter,
            actor_id,
        }
    }

    /// Returns true if this ticket is strictly later than `other`.
    pub fn is_after(&self, other: &Ticket) -> bool {
        self > other
    }

    /// Stable textual key, e.g. `"3:000000000000000a:1"`.
    pub fn key(&self) -> String {
        format!("{}:{:016x}:{}", self.lamport, self.actor_id, self.delimiter)
    }
}

impl PartialOrd for Ticket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lamport
            .cmp(&other.lamport)
            .then_with(|| self.actor_id.cmp(&other.actor_id))
            .then_with(|| self.delimiter.cmp(&other.delimiter))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

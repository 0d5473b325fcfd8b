//! Per-replica ticket issuer.
//!
//! This module contains the TicketClock, which hands out monotonically
//! increasing tickets for one replica and absorbs remote lamport values so
//! that local edits are always ordered after what the replica has seen.

use crate::crdt::types::replica::ActorId;
use crate::crdt::types::ticket::Ticket;

/// A lamport clock that issues [`Ticket`]s for a single replica.
#[derive(Debug, Clone)]
pub struct TicketClock {
    actor_id: ActorId,
    lamport: u64,
    delimiter: u32,
}

impl TicketClock {
    /// Creates a new clock for the given replica
    pub fn new(actor_id: ActorId) -> Self {
        TicketClock {
            actor_id,
            lamport: 0,
            delimiter: 0,
        }
    }

    /// Starts a new change and returns its first ticket.
    pub fn tick(&mut self) -> Ticket {
        self.lamport += 1;
        self.delimiter = 0;
        Ticket::new(self.lamport, self.delimiter, self.actor_id)
    }

    /// Returns the next ticket inside the current change.
    ///
    /// Starts a change first if none has been started yet.
    pub fn issue(&mut self) -> Ticket {
        if self.lamport == 0 {
            return self.tick();
        }
        self.delimiter += 1;
        Ticket::new(self.lamport, self.delimiter, self.actor_id)
    }

    /// Merges a ticket received from another replica.
    pub fn update(&mut self, remote: &Ticket) {
        if remote.lamport > self.lamport {
            self.lamport = remote.lamport;
            self.delimiter = 0;
        }
    }

    /// Gets the current lamport value (for debugging)
    pub fn current_lamport(&self) -> u64 {
        self.lamport
    }

    /// Gets the actor id
    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }
}

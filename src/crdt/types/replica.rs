//! Actor identifiers for replicas.
//!
//! Every replica editing a document gets a distinct actor id. It is embedded in
//! each ticket the replica issues, so tickets from different replicas never
//! collide even when their lamport values do.

/// A unique identifier for each replica (collaborator) in the distributed system.
pub type ActorId = u64;

/// Actor id of the structural minimum, carried by the head sentinel's ticket.
pub const INITIAL_ACTOR_ID: ActorId = 0;

/// Largest actor id, used by [`Ticket::MAX`](super::Ticket::MAX).
pub const MAX_ACTOR_ID: ActorId = ActorId::MAX;

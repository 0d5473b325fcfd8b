//! Logical-clock types for the RGA tree list.
//!
//! Tickets identify elements and order concurrent edits; the clock issues them
//! for a single replica.

pub mod clock;
pub mod replica;
pub mod ticket;

pub use clock::TicketClock;
pub use replica::{ActorId, INITIAL_ACTOR_ID, MAX_ACTOR_ID};
pub use ticket::Ticket;

//! CRDT (Conflict-free Replicated Data Type) implementation module.
//!
//! This module contains the RGA tree list and its supporting pieces: the
//! logical-clock types, the element capability, the node arena, the splay
//! index and the replicable operations.

pub mod element;
pub mod error;
pub mod node;
pub mod operation;
pub mod rga;
pub mod splay;
pub mod types;

// Re-export the main public API
pub use element::{Element, Primitive, PrimitiveValue};
pub use error::{Result, RgaError};
pub use node::{NodeArena, NodeId, RgaTreeListNode};
pub use operation::Operation;
pub use rga::{Nodes, RgaTreeList};
pub use splay::{SplayArena, SplayLinks, SplayTree};
pub use types::{ActorId, INITIAL_ACTOR_ID, MAX_ACTOR_ID, Ticket, TicketClock};

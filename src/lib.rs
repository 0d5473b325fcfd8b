//! # RGA tree list - Replicated Growable Array with a tree index
//!
//! The ordered-collection core of a replicated JSON document: an array whose
//! elements can be inserted, removed and moved concurrently by independent
//! replicas, and which converges to the same order on every replica no matter
//! in which order the edits arrive.
//!
//! ## Features
//!
//! - **Conflict-free**: Concurrent inserts after the same element are ordered by ticket
//! - **Idempotent**: Duplicated removals, moves and insertions are no-ops
//! - **Indexed**: A weighted splay tree answers index lookups in amortized O(log n)
//! - **Tombstone-based deletion**: Removed elements stay until garbage collected
//!
//! ## Example
//!
//! ```rust
//! use rga_tree_list::{Primitive, RgaTreeList, TicketClock};
//!
//! let mut clock = TicketClock::new(1); // actor id = 1
//! let mut list = RgaTreeList::new();
//! list.add(Primitive::new(0, clock.tick())).unwrap();
//! list.add(Primitive::new(1, clock.tick())).unwrap();
//! list.delete(0, clock.tick()).unwrap();
//! assert_eq!(list.marshal(), "[1]");
//! ```

pub mod crdt;

// Re-export the main public API from the CRDT module
pub use crdt::{ActorId, Ticket, TicketClock};
pub use crdt::{Element, Primitive, PrimitiveValue};
pub use crdt::{Nodes, Operation, RgaTreeList};
pub use crdt::{Result, RgaError};

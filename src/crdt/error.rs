//! Error type returned by fallible array operations.

use thiserror::Error;

use crate::crdt::types::Ticket;

pub type Result<T> = std::result::Result<T, RgaError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RgaError {
    /// The ticket was never inserted, or its node has already been purged.
    #[error("unknown element identifier: {0}")]
    UnknownTicket(Ticket),
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Delete, move and purge may not target the head sentinel.
    #[error("the head sentinel cannot be {0}")]
    SentinelTarget(&'static str),
}

//! Replicable edits on an array.
//!
//! A replica records every local edit as an [`Operation`] and ships it to its
//! peers, which execute it against their own copy. Operations are plain serde
//! values, so any transport that can carry JSON can carry them.

use serde::{Deserialize, Serialize};

use crate::crdt::element::{Element, Primitive};
use crate::crdt::error::Result;
use crate::crdt::rga::RgaTreeList;
use crate::crdt::types::Ticket;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation<E = Primitive> {
    /// Insert `element` after the element created at `prev_created_at`.
    Add { prev_created_at: Ticket, element: E },
    Move {
        prev_created_at: Ticket,
        created_at: Ticket,
        executed_at: Ticket,
    },
    Remove {
        created_at: Ticket,
        executed_at: Ticket,
    },
}

impl<E: Element + Clone> Operation<E> {
    /// Ticket of the edit itself.
    pub fn executed_at(&self) -> Ticket {
        match self {
            Operation::Add { element, .. } => element.created_at(),
            Operation::Move { executed_at, .. } | Operation::Remove { executed_at, .. } => {
                *executed_at
            }
        }
    }

    /// Applies the operation. Stale or duplicated operations are no-ops.
    pub fn execute(&self, list: &mut RgaTreeList<E>) -> Result<()> {
        match self {
            Operation::Add {
                prev_created_at,
                element,
            } => list.insert_after(*prev_created_at, element.clone()),
            Operation::Move {
                prev_created_at,
                created_at,
                executed_at,
            } => list.move_after(*prev_created_at, *created_at, *executed_at),
            Operation::Remove {
                created_at,
                executed_at,
            } => list
                .delete_by_created_at(*created_at, *executed_at)
                .map(|_| ()),
        }
    }
}

//! Elements stored in the array.
//!
//! The array only reads a handful of attributes from what it stores, described
//! by the [`Element`] trait. [`Primitive`] is the scalar element used for JSON
//! values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crdt::types::Ticket;

/// Capability every value stored in an [`RgaTreeList`](crate::RgaTreeList) must expose.
pub trait Element {
    /// Ticket assigned when the element was created. Never changes.
    fn created_at(&self) -> Ticket;

    /// Tombstone ticket, if the element has been removed.
    fn removed_at(&self) -> Option<Ticket>;

    /// Ticket of the most recently applied move, if any.
    fn moved_at(&self) -> Option<Ticket>;

    /// Applies a removal. Returns true if the removal ticket was accepted.
    ///
    /// A removal is accepted only when it is after the creation ticket and
    /// after any removal ticket applied before.
    fn remove(&mut self, removed_at: Ticket) -> bool;

    fn set_moved_at(&mut self, moved_at: Ticket);

    /// JSON rendering of the element.
    fn marshal(&self) -> String;

    fn is_removed(&self) -> bool {
        self.removed_at().is_some()
    }
}

/// Scalar payload of a [`Primitive`].
///
/// The wire form names the variant, so a long that fits in 32 bits still
/// decodes as a long on the receiving replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrimitiveValue {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
}

impl From<&PrimitiveValue> for Value {
    fn from(value: &PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Null => Value::Null,
            PrimitiveValue::Boolean(b) => Value::from(*b),
            PrimitiveValue::Integer(i) => Value::from(*i),
            PrimitiveValue::Long(l) => Value::from(*l),
            // Non-finite doubles become null.
            PrimitiveValue::Double(d) => Value::from(*d),
            PrimitiveValue::String(s) => Value::from(s.as_str()),
        }
    }
}

impl From<bool> for PrimitiveValue {
    fn from(value: bool) -> Self {
        PrimitiveValue::Boolean(value)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(value: i32) -> Self {
        PrimitiveValue::Integer(value)
    }
}

impl From<i64> for PrimitiveValue {
    fn from(value: i64) -> Self {
        PrimitiveValue::Long(value)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(value: f64) -> Self {
        PrimitiveValue::Double(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::String(value.to_owned())
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::String(value)
    }
}

/// A scalar JSON element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    value: PrimitiveValue,
    created_at: Ticket,
    moved_at: Option<Ticket>,
    removed_at: Option<Ticket>,
}

impl Primitive {
    /// Creates a live, never moved element.
    pub fn new(value: impl Into<PrimitiveValue>, created_at: Ticket) -> Self {
        Primitive {
            value: value.into(),
            created_at,
            moved_at: None,
            removed_at: None,
        }
    }

    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }
}

impl Element for Primitive {
    fn created_at(&self) -> Ticket {
        self.created_at
    }

    fn removed_at(&self) -> Option<Ticket> {
        self.removed_at
    }

    fn moved_at(&self) -> Option<Ticket> {
        self.moved_at
    }

    fn remove(&mut self, removed_at: Ticket) -> bool {
        let after_existing = self
            .removed_at
            .is_none_or(|existing| removed_at.is_after(&existing));
        if removed_at.is_after(&self.created_at) && after_existing {
            self.removed_at = Some(removed_at);
            return true;
        }
        false
    }

    fn set_moved_at(&mut self, moved_at: Ticket) {
        self.moved_at = Some(moved_at);
    }

    fn marshal(&self) -> String {
        Value::from(&self.value).to_string()
    }
}

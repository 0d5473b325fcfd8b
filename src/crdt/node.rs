//! Nodes of the RGA tree list and the arena that owns them.
//!
//! A node is at the same time an entry of the doubly linked list (its
//! `prev`/`next` handles) and a node of the splay index (its [`SplayLinks`]).
//! All nodes of one array live in a single [`NodeArena`]; the list, the tree
//! and the identity map only ever hold [`NodeId`] handles into it.

use std::ops::{Index, IndexMut};

use crate::crdt::element::Element;
use crate::crdt::splay::{SplayArena, SplayLinks};
use crate::crdt::types::Ticket;

/// Stable handle of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A single slot of the array.
///
/// Only the head sentinel has no element.
#[derive(Debug, Clone)]
pub struct RgaTreeListNode<E> {
    elem: Option<E>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) splay: SplayLinks,
}

impl<E: Element> RgaTreeListNode<E> {
    pub(crate) fn new(elem: E) -> Self {
        RgaTreeListNode {
            elem: Some(elem),
            prev: None,
            next: None,
            splay: SplayLinks::default(),
        }
    }

    pub(crate) fn sentinel() -> Self {
        RgaTreeListNode {
            elem: None,
            prev: None,
            next: None,
            splay: SplayLinks::default(),
        }
    }

    pub fn element(&self) -> Option<&E> {
        self.elem.as_ref()
    }

    pub(crate) fn into_element(self) -> Option<E> {
        self.elem
    }

    pub fn created_at(&self) -> Ticket {
        self.elem.as_ref().map_or(Ticket::INITIAL, Element::created_at)
    }

    /// The ticket that decides this node's place among its siblings: the last
    /// move if there was one, the creation otherwise.
    pub fn positioned_at(&self) -> Ticket {
        match &self.elem {
            Some(elem) => elem.moved_at().unwrap_or_else(|| elem.created_at()),
            None => Ticket::INITIAL,
        }
    }

    /// The sentinel counts as removed so it never carries rank weight.
    pub fn is_removed(&self) -> bool {
        self.elem.as_ref().is_none_or(Element::is_removed)
    }

    pub fn len(&self) -> usize {
        if self.is_removed() { 0 } else { 1 }
    }

    pub(crate) fn remove(&mut self, removed_at: Ticket) -> bool {
        self.elem.as_mut().is_some_and(|elem| elem.remove(removed_at))
    }

    pub(crate) fn set_moved_at(&mut self, moved_at: Ticket) {
        if let Some(elem) = self.elem.as_mut() {
            elem.set_moved_at(moved_at);
        }
    }
}

/// Owning table of nodes, with slot reuse after purge.
///
/// Indexing with a [`NodeId`] panics if the slot is empty. Handles only leave
/// the list through purge, which drops them from the identity map first, so a
/// dangling handle means the list's own links are corrupt.
#[derive(Debug, Clone)]
pub struct NodeArena<E> {
    slots: Vec<Option<RgaTreeListNode<E>>>,
    free: Vec<NodeId>,
}

impl<E> Default for NodeArena<E> {
    fn default() -> Self {
        NodeArena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<E> NodeArena<E> {
    pub(crate) fn alloc(&mut self, node: RgaTreeListNode<E>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Option<RgaTreeListNode<E>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(node)
    }

    /// Number of occupied slots, the sentinel included.
    pub fn occupied(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<E> Index<NodeId> for NodeArena<E> {
    type Output = RgaTreeListNode<E>;

    /// # Panics
    ///
    /// If `id` refers to a freed slot.
    fn index(&self, id: NodeId) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id.0),
        }
    }
}

impl<E> IndexMut<NodeId> for NodeArena<E> {
    /// # Panics
    ///
    /// If `id` refers to a freed slot.
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id.0),
        }
    }
}

impl<E: Element> SplayArena for NodeArena<E> {
    fn links(&self, id: NodeId) -> &SplayLinks {
        &self[id].splay
    }

    fn links_mut(&mut self, id: NodeId) -> &mut SplayLinks {
        &mut self[id].splay
    }

    fn len(&self, id: NodeId) -> usize {
        self[id].len()
    }

    fn annotation(&self, id: NodeId) -> String {
        self[id].element().map_or_else(String::new, Element::marshal)
    }
}

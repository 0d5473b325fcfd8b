//! Core RGA tree list implementation.
//!
//! This module contains [`RgaTreeList`], the replicated growable array backing
//! JSON arrays. The RGA itself is a linked list ordered by the tickets of its
//! elements; tombstones stay in the list so concurrent edits anchored on them
//! still land in the right place. A linked list alone makes index lookups
//! O(n), so every node is also kept in a weighted splay tree that counts only
//! live elements.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::crdt::element::Element;
use crate::crdt::error::{Result, RgaError};
use crate::crdt::node::{NodeArena, NodeId, RgaTreeListNode};
use crate::crdt::splay::SplayTree;
use crate::crdt::types::Ticket;

/// The Replicated Growable Array with a tree index.
///
/// # Design
///
/// - A head sentinel (ticket [`Ticket::INITIAL`]) is always the first list node
/// - Nodes are owned by one arena; list, tree and identity map hold handles
/// - Deletion tombstones the element in place; only [`purge`](Self::purge)
///   destroys a node
/// - Concurrent inserts after the same anchor are ordered by ticket, later
///   tickets closer to the anchor
///
/// The structure is not synchronized. Operations from other replicas are
/// applied one at a time, in any order, and converge to the same state.
#[derive(Debug, Clone)]
pub struct RgaTreeList<E> {
    /// Owner of every node, the head sentinel included
    nodes: NodeArena<E>,
    /// Order-statistic index over the list, weighted by liveness
    index: SplayTree,
    /// The head sentinel; never removed
    head: NodeId,
    /// Last node in list order, tombstones included
    last: NodeId,
    /// Number of live elements
    size: usize,
    /// Identity map from creation ticket to node
    node_map_by_created_at: HashMap<Ticket, NodeId>,
}

impl<E: Element> Default for RgaTreeList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> RgaTreeList<E> {
    /// Creates an empty list holding only the head sentinel.
    pub fn new() -> Self {
        let mut nodes = NodeArena::default();
        let head = nodes.alloc(RgaTreeListNode::sentinel());
        let mut node_map_by_created_at = HashMap::new();
        node_map_by_created_at.insert(Ticket::INITIAL, head);

        RgaTreeList {
            nodes,
            index: SplayTree::new(head),
            head,
            last: head,
            size: 0,
            node_map_by_created_at,
        }
    }

    /// Returns the JSON encoding of the live elements, e.g. `[1,"a",true]`.
    pub fn marshal(&self) -> String {
        let items: Vec<String> = self
            .nodes()
            .filter(|elem| !elem.is_removed())
            .map(Element::marshal)
            .collect();
        format!("[{}]", items.join(","))
    }

    /// Appends the element after the current last node.
    pub fn add(&mut self, elem: E) -> Result<()> {
        self.insert_after(self.last_created_at(), elem)
    }

    /// Inserts the element after the node created at `prev_created_at`.
    ///
    /// Nodes already after the anchor that were positioned later than the new
    /// element stay in front of it. An element whose creation ticket is
    /// already present is ignored, so a duplicated delivery of the same
    /// insertion is harmless.
    ///
    /// # Arguments
    ///
    /// * `prev_created_at` - Creation ticket of the anchor, or [`Ticket::INITIAL`]
    /// * `elem` - The element to insert
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the element was inserted or was already present
    /// * `Err(RgaError::UnknownTicket)` - If the anchor is not in the list
    pub fn insert_after(&mut self, prev_created_at: Ticket, elem: E) -> Result<()> {
        let created_at = elem.created_at();
        if self.node_map_by_created_at.contains_key(&created_at) {
            debug!(%created_at, "ignoring duplicate insertion");
            return Ok(());
        }
        let anchor = self.lookup(prev_created_at)?;

        let prev = self.find_next_before_executed_at(anchor, created_at);
        let id = self.nodes.alloc(RgaTreeListNode::new(elem));
        self.link_after(prev, id);
        Ok(())
    }

    /// Returns the live element at the given index.
    pub fn get(&self, index: usize) -> Result<&E> {
        let id = self.find_by_index(index)?;
        self.nodes[id].element().ok_or(RgaError::IndexOutOfBounds {
            index,
            len: self.size,
        })
    }

    /// Tombstones the element created at `created_at`.
    ///
    /// Removing an element that is already a tombstone leaves the length and
    /// the index untouched.
    ///
    /// # Arguments
    ///
    /// * `created_at` - Creation ticket of the element to remove
    /// * `deleted_at` - Ticket of the removal
    ///
    /// # Returns
    ///
    /// The element, tombstoned or not, after the removal was applied.
    pub fn delete_by_created_at(&mut self, created_at: Ticket, deleted_at: Ticket) -> Result<&E> {
        let id = self.lookup(created_at)?;
        if id == self.head {
            return Err(RgaError::SentinelTarget("deleted"));
        }

        let already_removed = self.nodes[id].is_removed();
        if !self.nodes[id].remove(deleted_at) {
            debug!(%created_at, %deleted_at, "ignoring stale removal");
        } else if already_removed {
            trace!(%created_at, %deleted_at, "advanced tombstone ticket");
        } else {
            self.index.splay(&mut self.nodes, id);
            self.size -= 1;
            trace!(%created_at, %deleted_at, "tombstoned element");
        }

        self.nodes[id]
            .element()
            .ok_or(RgaError::SentinelTarget("deleted"))
    }

    /// Tombstones the live element at the given index.
    pub fn delete(&mut self, index: usize, deleted_at: Ticket) -> Result<&E> {
        let id = self.find_by_index(index)?;
        let created_at = self.nodes[id].created_at();
        self.delete_by_created_at(created_at, deleted_at)
    }

    /// Moves the element created at `created_at` after `prev_created_at`.
    ///
    /// Each element keeps only its latest move: a move whose ticket is not
    /// after the element's current move ticket is ignored.
    pub fn move_after(
        &mut self,
        prev_created_at: Ticket,
        created_at: Ticket,
        executed_at: Ticket,
    ) -> Result<()> {
        let anchor = self.lookup(prev_created_at)?;
        let id = self.lookup(created_at)?;
        if id == self.head {
            return Err(RgaError::SentinelTarget("moved"));
        }
        if anchor == id {
            debug!(%created_at, "ignoring move after itself");
            return Ok(());
        }

        let accepted = self.nodes[id]
            .element()
            .and_then(Element::moved_at)
            .is_none_or(|moved_at| executed_at.is_after(&moved_at));
        if !accepted {
            debug!(%created_at, %executed_at, "ignoring stale move");
            return Ok(());
        }

        self.release(id);
        let prev = self.find_next_before_executed_at(anchor, executed_at);
        self.link_after(prev, id);
        self.nodes[id].set_moved_at(executed_at);
        Ok(())
    }

    /// Returns the creation ticket of the closest live element before the
    /// given one, or of the head sentinel if there is none.
    pub fn find_prev_created_at(&self, created_at: Ticket) -> Result<Ticket> {
        let mut id = self.lookup(created_at)?;
        while let Some(prev) = self.nodes[id].prev {
            id = prev;
            if id == self.head || !self.nodes[id].is_removed() {
                break;
            }
        }
        Ok(self.nodes[id].created_at())
    }

    /// Returns the creation ticket of the last node, tombstones included.
    pub fn last_created_at(&self) -> Ticket {
        self.nodes[self.last].created_at()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterates over every element in list order, tombstones included.
    pub fn nodes(&self) -> Nodes<'_, E> {
        Nodes {
            list: self,
            cursor: self.nodes[self.head].next,
        }
    }

    /// Physically removes the element created at `created_at` and returns it.
    ///
    /// Live elements can be purged too; the length drops accordingly.
    ///
    /// Called by the garbage collector once the tombstone is known to be seen
    /// by every replica.
    pub fn purge(&mut self, created_at: Ticket) -> Result<E> {
        let id = self.lookup(created_at)?;
        if id == self.head {
            return Err(RgaError::SentinelTarget("purged"));
        }

        self.release(id);
        trace!(%created_at, "purged element");
        self.nodes
            .free(id)
            .and_then(RgaTreeListNode::into_element)
            .ok_or(RgaError::UnknownTicket(created_at))
    }

    /// Debug rendering of the index tree, see [`SplayTree::annotated_string`].
    pub fn annotated_string(&self) -> String {
        self.index.annotated_string(&self.nodes)
    }

    fn lookup(&self, created_at: Ticket) -> Result<NodeId> {
        self.node_map_by_created_at
            .get(&created_at)
            .copied()
            .ok_or(RgaError::UnknownTicket(created_at))
    }

    fn find_by_index(&self, index: usize) -> Result<NodeId> {
        let out_of_bounds = RgaError::IndexOutOfBounds {
            index,
            len: self.size,
        };
        if index >= self.size {
            return Err(out_of_bounds);
        }

        let (mut id, offset) = self
            .index
            .find(&self.nodes, index)
            .ok_or_else(|| out_of_bounds.clone())?;
        if (index == 0 && id == self.head) || offset > 0 {
            loop {
                id = self.nodes[id].next.ok_or_else(|| out_of_bounds.clone())?;
                if !self.nodes[id].is_removed() {
                    break;
                }
            }
        }
        Ok(id)
    }

    /// Skips the nodes after `anchor` that were positioned later than
    /// `executed_at`; they belong closer to the anchor.
    fn find_next_before_executed_at(&self, anchor: NodeId, executed_at: Ticket) -> NodeId {
        let mut id = anchor;
        while let Some(next) = self.nodes[id].next {
            if !self.nodes[next].positioned_at().is_after(&executed_at) {
                break;
            }
            id = next;
        }
        id
    }

    fn link_after(&mut self, prev: NodeId, id: NodeId) {
        let prev_next = self.nodes[prev].next;
        self.nodes[id].prev = Some(prev);
        self.nodes[id].next = prev_next;
        self.nodes[prev].next = Some(id);
        if let Some(next) = prev_next {
            self.nodes[next].prev = Some(id);
        }
        if prev == self.last {
            self.last = id;
        }

        self.index.insert_after(&mut self.nodes, prev, id);
        let created_at = self.nodes[id].created_at();
        self.node_map_by_created_at.insert(created_at, id);

        if !self.nodes[id].is_removed() {
            self.size += 1;
        }
        trace!(%created_at, "linked element");
    }

    /// Detaches a node from the list, the tree and the identity map, leaving
    /// its slot allocated.
    fn release(&mut self, id: NodeId) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        if self.last == id {
            self.last = prev.unwrap_or(self.head);
        }
        if let Some(prev) = prev {
            self.nodes[prev].next = next;
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }
        self.nodes[id].prev = None;
        self.nodes[id].next = None;

        self.index.delete(&mut self.nodes, id);
        let created_at = self.nodes[id].created_at();
        self.node_map_by_created_at.remove(&created_at);

        if !self.nodes[id].is_removed() {
            self.size -= 1;
        }
    }
}

impl<E: Element> fmt::Display for RgaTreeList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marshal())
    }
}

/// Iterator returned by [`RgaTreeList::nodes`].
pub struct Nodes<'a, E> {
    list: &'a RgaTreeList<E>,
    cursor: Option<NodeId>,
}

impl<'a, E: Element> Iterator for Nodes<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = &list.nodes[self.cursor?];
        self.cursor = node.next;
        node.element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::element::Primitive;
    use crate::crdt::splay::SplayArena;
    use crate::crdt::types::TicketClock;

    impl<E: Element> RgaTreeList<E> {
        /// Walks the list and checks that tree ranks, the identity map, the
        /// tail and the live counter all agree with it.
        fn assert_consistent(&self) {
            let mut order = Vec::new();
            let mut cursor = Some(self.head);
            let mut prev = None;
            while let Some(id) = cursor {
                assert_eq!(self.nodes[id].prev, prev, "broken back link");
                order.push(id);
                prev = Some(id);
                cursor = self.nodes[id].next;
            }

            assert_eq!(order[0], self.head);
            assert_eq!(order.last().copied(), Some(self.last));
            assert_eq!(self.node_map_by_created_at.len(), order.len());
            assert_eq!(self.nodes.occupied(), order.len());

            let mut rank = 0;
            for &id in &order {
                let created_at = self.nodes[id].created_at();
                assert_eq!(self.node_map_by_created_at.get(&created_at), Some(&id));
                assert_eq!(self.index.rank_of(&self.nodes, id), rank);
                rank += self.nodes.len(id);
            }
            assert_eq!(rank, self.size);

            let root = self.index.root().expect("tree has a root");
            assert_eq!(self.nodes.links(root).weight, self.size);
        }
    }

    fn list_of(clock: &mut TicketClock, values: &[i32]) -> RgaTreeList<Primitive> {
        let mut list = RgaTreeList::new();
        for &v in values {
            list.add(Primitive::new(v, clock.tick())).unwrap();
            list.assert_consistent();
        }
        list
    }

    #[test]
    fn test_rga_tree_list_creation() {
        let list: RgaTreeList<Primitive> = RgaTreeList::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.marshal(), "[]");
        assert_eq!(list.last_created_at(), Ticket::INITIAL);
        assert_eq!(list.nodes().count(), 0);
        list.assert_consistent();
    }

    #[test]
    fn test_add_and_get() {
        let mut clock = TicketClock::new(1);
        let list = list_of(&mut clock, &[0, 1, 2, 3, 4]);

        assert_eq!(list.len(), 5);
        assert_eq!(list.marshal(), "[0,1,2,3,4]");
        for i in 0..5 {
            assert_eq!(list.get(i).unwrap().marshal(), i.to_string());
        }
        assert_eq!(
            list.get(5),
            Err(RgaError::IndexOutOfBounds { index: 5, len: 5 })
        );
    }

    #[test]
    fn test_delete_and_purge() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[0, 1, 2]);
        assert_eq!(list.marshal(), "[0,1,2]");

        let target = list.get(1).unwrap().created_at();
        list.delete_by_created_at(target, clock.tick()).unwrap();
        list.assert_consistent();
        assert_eq!(list.marshal(), "[0,2]");
        assert_eq!(list.len(), 2);

        let purged = list.purge(target).unwrap();
        list.assert_consistent();
        assert_eq!(purged.created_at(), target);
        assert_eq!(list.len(), 2);
        assert_eq!(list.nodes().count(), 2);
        assert!(list.nodes().all(|e| e.created_at() != target));
        assert_eq!(list.purge(target), Err(RgaError::UnknownTicket(target)));
    }

    #[test]
    fn test_get_skips_tombstones() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2, 3]);

        let removed = list.delete(1, clock.tick()).unwrap();
        assert_eq!(removed.marshal(), "2");
        list.assert_consistent();

        assert_eq!(list.marshal(), "[1,3]");
        assert_eq!(list.get(0).unwrap().marshal(), "1");
        assert_eq!(list.get(1).unwrap().marshal(), "3");
    }

    #[test]
    fn test_get_with_leading_tombstones() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2, 3, 4]);

        list.delete(0, clock.tick()).unwrap();
        list.delete(0, clock.tick()).unwrap();
        list.assert_consistent();

        assert_eq!(list.marshal(), "[3,4]");
        assert_eq!(list.get(0).unwrap().marshal(), "3");
        assert_eq!(list.get(1).unwrap().marshal(), "4");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2, 3]);
        let target = list.get(2).unwrap().created_at();

        let first = clock.tick();
        list.delete_by_created_at(target, first).unwrap();
        let tree_after_first = list.annotated_string();
        assert_eq!(list.len(), 2);

        let removed = list.delete_by_created_at(target, first).unwrap();
        assert_eq!(removed.removed_at(), Some(first));
        assert_eq!(list.len(), 2);
        assert_eq!(list.annotated_string(), tree_after_first);

        // A later tombstone ticket replaces the old one but does not count twice.
        let later = clock.tick();
        let removed = list.delete_by_created_at(target, later).unwrap();
        assert_eq!(removed.removed_at(), Some(later));
        assert_eq!(list.len(), 2);
        assert_eq!(list.annotated_string(), tree_after_first);
        list.assert_consistent();
    }

    #[test]
    fn test_concurrent_inserts_order_by_ticket() {
        let mut clock = TicketClock::new(1);
        let base = list_of(&mut clock, &[0]);
        let anchor = base.get(0).unwrap().created_at();

        let x = Primitive::new(10, Ticket::new(5, 0, 1));
        let y = Primitive::new(20, Ticket::new(5, 0, 2));

        let mut one = base.clone();
        one.insert_after(anchor, x.clone()).unwrap();
        one.insert_after(anchor, y.clone()).unwrap();

        let mut two = base.clone();
        two.insert_after(anchor, y).unwrap();
        two.insert_after(anchor, x).unwrap();

        one.assert_consistent();
        two.assert_consistent();
        // The later ticket lands closer to the anchor.
        assert_eq!(one.marshal(), "[0,20,10]");
        assert_eq!(two.marshal(), "[0,20,10]");
    }

    #[test]
    fn test_duplicate_insertion_is_ignored() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1]);
        let elem = Primitive::new(2, clock.tick());

        list.add(elem.clone()).unwrap();
        list.add(elem).unwrap();
        list.assert_consistent();
        assert_eq!(list.marshal(), "[1,2]");
    }

    #[test]
    fn test_purged_ticket_is_unknown_after_slot_reuse() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2]);
        let purged = list.get(0).unwrap().created_at();
        list.purge(purged).unwrap();

        // The freed slot is handed to the next insertion.
        list.add(Primitive::new(3, clock.tick())).unwrap();
        list.assert_consistent();

        assert_eq!(
            list.delete_by_created_at(purged, clock.tick()).map(|_| ()),
            Err(RgaError::UnknownTicket(purged))
        );
        assert_eq!(
            list.move_after(Ticket::INITIAL, purged, clock.tick()),
            Err(RgaError::UnknownTicket(purged))
        );
        assert_eq!(list.purge(purged).map(|_| ()), Err(RgaError::UnknownTicket(purged)));
        assert_eq!(list.marshal(), "[2,3]");
        list.assert_consistent();
    }

    #[test]
    fn test_duplicate_insertion_after_anchor_purged() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1]);
        let anchor = list.get(0).unwrap().created_at();
        let elem = Primitive::new(2, clock.tick());
        list.insert_after(anchor, elem.clone()).unwrap();

        list.delete_by_created_at(anchor, clock.tick()).unwrap();
        list.purge(anchor).unwrap();

        // Redelivery is still a no-op even though its anchor is gone.
        assert_eq!(list.insert_after(anchor, elem), Ok(()));
        assert_eq!(list.marshal(), "[2]");
        list.assert_consistent();

        // A new element anchored on the purged ticket is still rejected.
        let fresh = Primitive::new(3, clock.tick());
        assert_eq!(list.insert_after(anchor, fresh), Err(RgaError::UnknownTicket(anchor)));
    }

    #[test]
    fn test_insert_after_unknown_ticket() {
        let mut list: RgaTreeList<Primitive> = RgaTreeList::new();
        let missing = Ticket::new(9, 0, 9);
        let result = list.insert_after(missing, Primitive::new(1, Ticket::new(10, 0, 1)));

        assert_eq!(result, Err(RgaError::UnknownTicket(missing)));
        assert!(list.is_empty());
        list.assert_consistent();
    }

    #[test]
    fn test_move_after_and_lww() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[0, 1, 2]);
        let first = list.get(0).unwrap().created_at();
        let last = list.get(2).unwrap().created_at();

        let older = clock.tick();
        let newer = clock.tick();

        list.move_after(last, first, newer).unwrap();
        list.assert_consistent();
        assert_eq!(list.marshal(), "[1,2,0]");
        assert_eq!(list.last_created_at(), first);

        // Older and duplicated moves are ignored.
        let head = Ticket::INITIAL;
        list.move_after(head, first, older).unwrap();
        list.move_after(head, first, newer).unwrap();
        list.assert_consistent();
        assert_eq!(list.marshal(), "[1,2,0]");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_move_tombstone_keeps_len() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[0, 1, 2]);
        let middle = list.get(1).unwrap().created_at();
        let last = list.get(2).unwrap().created_at();

        list.delete_by_created_at(middle, clock.tick()).unwrap();
        list.move_after(last, middle, clock.tick()).unwrap();

        list.assert_consistent();
        assert_eq!(list.len(), 2);
        assert_eq!(list.marshal(), "[0,2]");
        assert_eq!(list.last_created_at(), middle);
    }

    #[test]
    fn test_move_rejects_sentinel_and_unknown() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[0]);
        let only = list.get(0).unwrap().created_at();
        let missing = Ticket::new(99, 0, 7);

        assert_eq!(
            list.move_after(only, Ticket::INITIAL, clock.tick()),
            Err(RgaError::SentinelTarget("moved"))
        );
        assert_eq!(
            list.move_after(missing, only, clock.tick()),
            Err(RgaError::UnknownTicket(missing))
        );
        assert_eq!(list.move_after(only, only, clock.tick()), Ok(()));
        list.assert_consistent();
        assert_eq!(list.marshal(), "[0]");
    }

    #[test]
    fn test_find_prev_created_at_skips_tombstones() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[0, 1, 2, 3]);
        let tickets: Vec<Ticket> = list.nodes().map(Element::created_at).collect();

        list.delete_by_created_at(tickets[1], clock.tick()).unwrap();
        list.delete_by_created_at(tickets[2], clock.tick()).unwrap();

        assert_eq!(list.find_prev_created_at(tickets[3]), Ok(tickets[0]));
        assert_eq!(list.find_prev_created_at(tickets[0]), Ok(Ticket::INITIAL));

        list.delete_by_created_at(tickets[0], clock.tick()).unwrap();
        assert_eq!(list.find_prev_created_at(tickets[3]), Ok(Ticket::INITIAL));
    }

    #[test]
    fn test_marshal_with_tombstoned_tail() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2, 3]);

        list.delete(2, clock.tick()).unwrap();
        assert_eq!(list.marshal(), "[1,2]");
        assert_eq!(list.to_string(), "[1,2]");

        list.delete(0, clock.tick()).unwrap();
        list.delete(0, clock.tick()).unwrap();
        assert_eq!(list.marshal(), "[]");
    }

    #[test]
    fn test_purge_tail_updates_last() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2]);
        let tail = list.last_created_at();
        let before_tail = list.get(0).unwrap().created_at();

        list.purge(tail).unwrap();
        list.assert_consistent();
        assert_eq!(list.len(), 1);
        assert_eq!(list.last_created_at(), before_tail);

        list.add(Primitive::new(3, clock.tick())).unwrap();
        list.assert_consistent();
        assert_eq!(list.marshal(), "[1,3]");
    }

    #[test]
    fn test_sentinel_cannot_be_deleted_or_purged() {
        let mut list: RgaTreeList<Primitive> = RgaTreeList::new();
        assert_eq!(
            list.delete_by_created_at(Ticket::INITIAL, Ticket::new(1, 0, 1))
                .map(|_| ()),
            Err(RgaError::SentinelTarget("deleted"))
        );
        assert_eq!(
            list.purge(Ticket::INITIAL).map(|_| ()),
            Err(RgaError::SentinelTarget("purged"))
        );
        list.assert_consistent();
    }

    #[test]
    fn test_annotated_string() {
        let mut clock = TicketClock::new(1);
        let mut list = list_of(&mut clock, &[1, 2]);
        assert_eq!(list.annotated_string(), "[0,0][1,1]1[2,1]2");

        list.delete(0, clock.tick()).unwrap();
        assert_eq!(list.annotated_string(), "[0,0][1,0]1[1,1]2");
    }

    #[test]
    fn test_mixed_operations_stay_consistent() {
        let mut clock = TicketClock::new(3);
        let mut list = list_of(&mut clock, &[0, 1, 2, 3, 4, 5, 6, 7]);

        for step in 0..24u32 {
            let len = list.len();
            match step % 4 {
                0 if len > 0 => {
                    list.delete((step as usize * 7) % len, clock.tick()).unwrap();
                }
                1 => {
                    let anchor = if len > 0 {
                        list.get((step as usize) % len).unwrap().created_at()
                    } else {
                        Ticket::INITIAL
                    };
                    let value = 100 + step as i32;
                    list.insert_after(anchor, Primitive::new(value, clock.tick()))
                        .unwrap();
                }
                2 if len > 1 => {
                    let target = list.get(0).unwrap().created_at();
                    let anchor = list.get(len - 1).unwrap().created_at();
                    list.move_after(anchor, target, clock.tick()).unwrap();
                }
                _ => {
                    let removed: Vec<Ticket> = list
                        .nodes()
                        .filter(|e| e.is_removed())
                        .map(Element::created_at)
                        .collect();
                    if let Some(&ticket) = removed.first() {
                        list.purge(ticket).unwrap();
                    }
                }
            }
            list.assert_consistent();
        }
    }
}

//! Weighted splay tree used as the positional index of the array.
//!
//! The tree is intrusive: its links live inside the array's nodes and the tree
//! itself only remembers the root. Each node weighs 1 when live and 0 when it
//! is a tombstone, and every node caches the total weight of its subtree, so
//! the tree can answer "which node holds the n-th live element" by descending
//! from the root.
//!
//! Recently touched nodes are splayed to the root, which keeps sequential
//! edits (the common case while typing or appending) cheap.

use crate::crdt::node::NodeId;

/// Tree links and cached subtree weight of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplayLinks {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Sum of the own weights in the subtree rooted here
    pub weight: usize,
}

/// Storage the tree operates on.
pub trait SplayArena {
    fn links(&self, id: NodeId) -> &SplayLinks;

    fn links_mut(&mut self, id: NodeId) -> &mut SplayLinks;

    /// Own weight of a node: 1 if live, 0 otherwise.
    fn len(&self, id: NodeId) -> usize;

    /// Label shown by [`SplayTree::annotated_string`].
    fn annotation(&self, id: NodeId) -> String;
}

/// A weighted splay tree whose nodes live in a [`SplayArena`].
///
/// The tree only stores its root; every other link is kept inside the arena,
/// next to the node it belongs to.
#[derive(Debug, Clone, Default)]
pub struct SplayTree {
    root: Option<NodeId>,
}

impl SplayTree {
    /// Creates a tree holding a single node.
    ///
    /// # Arguments
    ///
    /// * `root` - The first node, usually the list's head sentinel
    pub fn new(root: NodeId) -> Self {
        SplayTree { root: Some(root) }
    }

    /// Current root, if the tree is not empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Finds the node at the given weight position.
    ///
    /// Returns the node whose weight range ends at or contains `pos` together
    /// with the offset of `pos` inside that node. Ties go to the leftmost
    /// candidate, so position 0 always resolves to the first node of the tree.
    pub fn find<A: SplayArena>(&self, arena: &A, mut pos: usize) -> Option<(NodeId, usize)> {
        let mut node = self.root?;
        loop {
            let links = *arena.links(node);
            let left_weight = Self::weight_of(arena, links.left);
            let len = arena.len(node);

            match (links.left, links.right) {
                (Some(left), _) if pos <= left_weight => node = left,
                (_, Some(right)) if left_weight + len < pos => {
                    pos -= left_weight + len;
                    node = right;
                }
                _ => {
                    pos -= left_weight;
                    break;
                }
            }
        }

        if pos > arena.len(node) {
            return None;
        }
        Some((node, pos))
    }

    /// Returns the number of weight units before `node` in tree order.
    ///
    /// Unlike a splay-based lookup this does not restructure the tree.
    pub fn rank_of<A: SplayArena>(&self, arena: &A, node: NodeId) -> usize {
        let mut rank = Self::weight_of(arena, arena.links(node).left);
        let mut child = node;
        while let Some(parent) = arena.links(child).parent {
            if arena.links(parent).right == Some(child) {
                rank += Self::weight_of(arena, arena.links(parent).left) + arena.len(parent);
            }
            child = parent;
        }
        rank
    }

    /// Links `node` into the tree immediately after `prev` and makes it the root.
    pub fn insert_after<A: SplayArena>(&mut self, arena: &mut A, prev: NodeId, node: NodeId) {
        self.splay(arena, prev);
        self.root = Some(node);

        let prev_right = arena.links(prev).right;
        arena.links_mut(node).right = prev_right;
        if let Some(right) = prev_right {
            arena.links_mut(right).parent = Some(node);
        }
        arena.links_mut(node).left = Some(prev);
        arena.links_mut(prev).parent = Some(node);
        arena.links_mut(prev).right = None;

        Self::update_weight(arena, prev);
        Self::update_weight(arena, node);
    }

    /// Unlinks `node` from the tree, joining its former subtrees.
    pub fn delete<A: SplayArena>(&mut self, arena: &mut A, node: NodeId) {
        self.splay(arena, node);

        let SplayLinks { left, right, .. } = *arena.links(node);
        if let Some(left) = left {
            arena.links_mut(left).parent = None;
        }
        if let Some(right) = right {
            arena.links_mut(right).parent = None;
        }

        self.root = match left {
            Some(left) => {
                let mut left_tree = SplayTree { root: Some(left) };
                let max = left_tree.maximum(arena, left);
                left_tree.splay(arena, max);

                arena.links_mut(max).right = right;
                if let Some(right) = right {
                    arena.links_mut(right).parent = Some(max);
                }
                Some(max)
            }
            None => right,
        };

        *arena.links_mut(node) = SplayLinks::default();
        if let Some(root) = self.root {
            Self::update_weight(arena, root);
        }
    }

    /// Rotates `node` up to the root, refreshing weights along the way.
    pub fn splay<A: SplayArena>(&mut self, arena: &mut A, node: NodeId) {
        loop {
            let Some(parent) = arena.links(node).parent else {
                Self::update_weight(arena, node);
                return;
            };
            let node_is_left = arena.links(parent).left == Some(node);

            let Some(grand) = arena.links(parent).parent else {
                // zig
                if node_is_left {
                    self.rotate_right(arena, node);
                } else {
                    self.rotate_left(arena, node);
                }
                Self::update_weight(arena, node);
                return;
            };
            let parent_is_left = arena.links(grand).left == Some(parent);

            match (parent_is_left, node_is_left) {
                // zig-zag
                (true, false) => {
                    self.rotate_left(arena, node);
                    self.rotate_right(arena, node);
                }
                (false, true) => {
                    self.rotate_right(arena, node);
                    self.rotate_left(arena, node);
                }
                // zig-zig
                (true, true) => {
                    self.rotate_right(arena, parent);
                    self.rotate_right(arena, node);
                }
                (false, false) => {
                    self.rotate_left(arena, parent);
                    self.rotate_left(arena, node);
                }
            }
        }
    }

    /// In-order rendering of the tree as `[subtree weight,own weight]label`.
    pub fn annotated_string<A: SplayArena>(&self, arena: &A) -> String {
        let mut out = String::new();
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = arena.links(node).left;
            }
            if let Some(node) = stack.pop() {
                out.push_str(&format!(
                    "[{},{}]{}",
                    arena.links(node).weight,
                    arena.len(node),
                    arena.annotation(node)
                ));
                current = arena.links(node).right;
            }
        }
        out
    }

    /// Recomputes the subtree weight of `node` from its own weight and its
    /// children. Call after a node's own weight changes, then splay it.
    pub fn update_weight<A: SplayArena>(arena: &mut A, node: NodeId) {
        let links = *arena.links(node);
        let weight = arena.len(node)
            + Self::weight_of(arena, links.left)
            + Self::weight_of(arena, links.right);
        arena.links_mut(node).weight = weight;
    }

    fn weight_of<A: SplayArena>(arena: &A, node: Option<NodeId>) -> usize {
        node.map_or(0, |n| arena.links(n).weight)
    }

    fn maximum<A: SplayArena>(&self, arena: &A, mut node: NodeId) -> NodeId {
        while let Some(right) = arena.links(node).right {
            node = right;
        }
        node
    }

    fn rotate_left<A: SplayArena>(&mut self, arena: &mut A, pivot: NodeId) {
        let Some(root) = arena.links(pivot).parent else {
            return;
        };
        let grand = arena.links(root).parent;
        self.replace_child(arena, grand, root, pivot);
        arena.links_mut(pivot).parent = grand;

        let inner = arena.links(pivot).left;
        arena.links_mut(root).right = inner;
        if let Some(inner) = inner {
            arena.links_mut(inner).parent = Some(root);
        }
        arena.links_mut(pivot).left = Some(root);
        arena.links_mut(root).parent = Some(pivot);

        Self::update_weight(arena, root);
        Self::update_weight(arena, pivot);
    }

    fn rotate_right<A: SplayArena>(&mut self, arena: &mut A, pivot: NodeId) {
        let Some(root) = arena.links(pivot).parent else {
            return;
        };
        let grand = arena.links(root).parent;
        self.replace_child(arena, grand, root, pivot);
        arena.links_mut(pivot).parent = grand;

        let inner = arena.links(pivot).right;
        arena.links_mut(root).left = inner;
        if let Some(inner) = inner {
            arena.links_mut(inner).parent = Some(root);
        }
        arena.links_mut(pivot).right = Some(root);
        arena.links_mut(root).parent = Some(pivot);

        Self::update_weight(arena, root);
        Self::update_weight(arena, pivot);
    }

    fn replace_child<A: SplayArena>(
        &mut self,
        arena: &mut A,
        parent: Option<NodeId>,
        old: NodeId,
        new: NodeId,
    ) {
        match parent {
            Some(parent) if arena.links(parent).left == Some(old) => {
                arena.links_mut(parent).left = Some(new);
            }
            Some(parent) => arena.links_mut(parent).right = Some(new),
            None => self.root = Some(new),
        }
    }
}

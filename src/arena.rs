use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Tree node in the arena-based k-ary tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Opaque string payload; blank for freshly inserted nodes
    pub label: String,
    /// Index of the parent node, None for the root or while dematerialized
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub(crate) fn new(label: impl Into<String>, parent: Option<Index>) -> Self {
        Self {
            label: label.into(),
            parent,
            children: Vec::new(),
        }
    }

    /// Blank node as produced by the insert operations; the payload is
    /// filled in afterwards through `get_node_mut`.
    pub(crate) fn blank(parent: Option<Index>) -> Self {
        Self::new(String::new(), parent)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Arena-based k-ary tree with breadth-first editing operations.
///
/// Nodes are addressed by `generational_arena::Index`: index equality is
/// reference identity, and a removed node's slot is generation-bumped so a
/// stale handle never resolves to (or matches) a later node. The root is
/// created blank at construction and lives for the arena's lifetime.
///
/// Every operation below is a queue-driven breadth-first traversal with
/// early exit, O(n) worst case. Nothing recurses, so deep trees carry no
/// call-stack growth.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    pub(crate) arena: Arena<TreeNode>,
    /// Index of the root node
    pub(crate) root: Index,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::blank(None));
        Self { arena, root }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Index {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// A node is a leaf iff its child list is empty. Unknown indices are
    /// not leaves.
    #[instrument(level = "trace", skip(self))]
    pub fn is_leaf(&self, idx: Index) -> bool {
        self.arena
            .get(idx)
            .map_or(false, |node| node.children.is_empty())
    }

    /// Inserts a new blank node as the last child of `target`.
    ///
    /// Breadth-first search from the root, comparing each dequeued index
    /// against `target` by identity. Returns false and leaves the tree
    /// unchanged when `target` is not reachable (stale or foreign handle).
    #[instrument(level = "debug", skip(self))]
    pub fn insert_child(&mut self, target: Index) -> bool {
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            if current == target {
                let child = self.arena.insert(TreeNode::blank(Some(current)));
                if let Some(node) = self.arena.get_mut(current) {
                    node.children.push(child);
                }
                return true;
            }
            if let Some(node) = self.arena.get(current) {
                queue.extend(node.children.iter().copied());
            }
        }

        false
    }

    /// Inserts a new blank node immediately after `target` in its parent's
    /// child list, so it becomes `target`'s next sibling rather than the
    /// last sibling.
    ///
    /// Breadth-first search from the root, scanning each dequeued node's
    /// child list for `target`. The root is never anyone's child, so asking
    /// for a sibling of the root fails without a special case.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_sibling(&mut self, target: Index) -> bool {
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            let position = self
                .arena
                .get(current)
                .and_then(|node| node.children.iter().position(|&child| child == target));

            if let Some(i) = position {
                let sibling = self.arena.insert(TreeNode::blank(Some(current)));
                if let Some(node) = self.arena.get_mut(current) {
                    node.children.insert(i + 1, sibling);
                }
                return true;
            }
            if let Some(node) = self.arena.get(current) {
                queue.extend(node.children.iter().copied());
            }
        }

        false
    }

    /// Detaches `target` and frees its entire subtree.
    ///
    /// Breadth-first search from the root, scanning child lists; on a match
    /// the entry is spliced out and the detached subtree is released from
    /// the arena wholesale. The root is only ever reachable as a dequeued
    /// node, never as a child, so it cannot be removed through this
    /// operation.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, target: Index) -> bool {
        // Nothing is removable while the root is childless.
        if self
            .arena
            .get(self.root)
            .map_or(true, |root| root.children.is_empty())
        {
            return false;
        }

        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            let position = self
                .arena
                .get(current)
                .and_then(|node| node.children.iter().position(|&child| child == target));

            if let Some(i) = position {
                if let Some(node) = self.arena.get_mut(current) {
                    node.children.remove(i);
                }
                self.free_subtree(target);
                return true;
            }
            if let Some(node) = self.arena.get(current) {
                queue.extend(node.children.iter().copied());
            }
        }

        false
    }

    /// Releases a detached subtree from the arena, level by level.
    fn free_subtree(&mut self, start: Index) {
        let mut pending = VecDeque::new();
        pending.push_back(start);

        while let Some(current) = pending.pop_front() {
            if let Some(node) = self.arena.remove(current) {
                pending.extend(node.children);
            }
        }
    }

    /// Sets every non-root node's parent link to its actual parent.
    ///
    /// Required after rebuilding a tree from its persisted shape and before
    /// resuming edits. Idempotent.
    #[instrument(level = "debug", skip(self))]
    pub fn materialize_parents(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            let children = self
                .arena
                .get(current)
                .map(|node| node.children.clone())
                .unwrap_or_default();

            for &child in &children {
                if let Some(node) = self.arena.get_mut(child) {
                    node.parent = Some(current);
                }
            }
            queue.extend(children);
        }
    }

    /// Clears every node's parent link.
    ///
    /// Parent links are cyclic back-references; they must be gone before
    /// the tree is handed to a tree-shaped encoding. Idempotent.
    #[instrument(level = "debug", skip(self))]
    pub fn dematerialize_parents(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            let children = self
                .arena
                .get(current)
                .map(|node| node.children.clone())
                .unwrap_or_default();

            for &child in &children {
                if let Some(node) = self.arena.get_mut(child) {
                    node.parent = None;
                }
            }
            queue.extend(children);
        }
    }

    /// Depth of the tree, counting the root level as 1. Breadth-first with
    /// (node, depth) pairs in the queue.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::new();
        queue.push_back((self.root, 1));

        while let Some((current, depth)) = queue.pop_front() {
            if depth > max_depth {
                max_depth = depth;
            }
            if let Some(node) = self.arena.get(current) {
                for &child in &node.children {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Collects the indices of all leaf nodes in breadth-first order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while let Some(current) = queue.pop_front() {
            if let Some(node) = self.arena.get(current) {
                if node.children.is_empty() {
                    leaves.push(current);
                } else {
                    queue.extend(node.children.iter().copied());
                }
            }
        }

        leaves
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIter {
        TreeIter::new(self)
    }
}

/// Breadth-first iterator over all nodes, root first.
pub struct TreeIter<'a> {
    arena: &'a TreeArena,
    queue: VecDeque<Index>,
}

impl<'a> TreeIter<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(arena.root());
        Self { arena, queue }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.queue.pop_front() {
            if let Some(node) = self.arena.get_node(current) {
                self.queue.extend(node.children.iter().copied());
                return Some((current, node));
            }
        }
        None
    }
}

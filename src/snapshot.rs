//! Parent-free persisted representation of a tree.

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::arena::{TreeArena, TreeNode};
use crate::error::{TreeError, TreeResult};

/// Persisted tree shape: a label plus ordered children, no parent field.
///
/// Parent links are navigation-only back-references and would make a
/// tree-shaped encoding cyclic, so they are absent here by construction.
/// Dematerialize a tree before capturing it, and materialize again after
/// restoring one, per the engine's link-state contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub label: String,
    pub children: Vec<Snapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> TreeResult<String> {
        serde_json::to_string(self).map_err(TreeError::Encode)
    }

    pub fn from_json(payload: &str) -> TreeResult<Self> {
        serde_json::from_str(payload).map_err(TreeError::Decode)
    }
}

impl TreeArena {
    /// Captures the tree as its persisted shape.
    #[instrument(level = "debug", skip(self))]
    pub fn to_snapshot(&self) -> Snapshot {
        fn build(tree: &TreeArena, idx: Index) -> Snapshot {
            match tree.get_node(idx) {
                Some(node) => Snapshot {
                    label: node.label.clone(),
                    children: node
                        .children
                        .iter()
                        .map(|&child| build(tree, child))
                        .collect(),
                },
                // Child lists only hold live indices.
                None => Snapshot {
                    label: String::new(),
                    children: Vec::new(),
                },
            }
        }

        build(self, self.root())
    }

    /// Rebuilds a tree from its persisted shape, iteratively via an
    /// explicit stack.
    ///
    /// The result is dematerialized: every parent link is None until
    /// [`TreeArena::materialize_parents`] runs.
    #[instrument(level = "debug", skip(snapshot))]
    pub fn from_snapshot(snapshot: Snapshot) -> TreeArena {
        let mut arena = Arena::new();
        let Snapshot { label, children } = snapshot;
        let root = arena.insert(TreeNode::new(label, None));

        let mut stack = vec![(root, children)];
        while let Some((parent_idx, children)) = stack.pop() {
            for child in children {
                let Snapshot {
                    label,
                    children: grandchildren,
                } = child;
                let child_idx = arena.insert(TreeNode::new(label, None));
                if let Some(parent) = arena.get_mut(parent_idx) {
                    parent.children.push(child_idx);
                }
                stack.push((child_idx, grandchildren));
            }
        }

        TreeArena { arena, root }
    }
}

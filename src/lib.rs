//! Arena-based k-ary tree with breadth-first structural editing.
//!
//! Nodes live in a generational arena and are addressed by
//! [`generational_arena::Index`] handles; index equality is reference
//! identity, so two nodes with equal labels stay distinguishable. The
//! engine offers three structural mutations (insert child, insert sibling,
//! remove subtree) plus reversible parent-link (de)materialization for
//! serialization, each a queue-driven breadth-first traversal.
//!
//! The tree has two link states. While *materialized*, every non-root
//! node's parent link points at its actual parent; this is the state for
//! editing and navigation. While *dematerialized*, all parent links are
//! cleared; this is the state for handing the tree to a tree-shaped
//! encoding (see [`Snapshot`]). The engine does not police the contract,
//! it only provides the two passes to switch between the states.

pub mod arena;
pub mod error;
pub mod snapshot;
pub mod tree_traits;
pub mod util;

pub use arena::{TreeArena, TreeIter, TreeNode};
pub use error::{TreeError, TreeResult};
pub use snapshot::Snapshot;

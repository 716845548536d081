use generational_arena::Index;
use termtree::Tree;

use crate::arena::{TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

// Blank labels are the norm for freshly inserted nodes; render them
// visibly so the tree shape stays readable.
fn display_label(node: &TreeNode) -> String {
    if node.label.is_empty() {
        "(blank)".to_string()
    } else {
        node.label.clone()
    }
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(display_label(child));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let root_label = self
            .get_node(self.root())
            .map(display_label)
            .unwrap_or_default();
        let mut tree = Tree::new(root_label);
        build_tree(self, self.root(), &mut tree);
        tree
    }
}

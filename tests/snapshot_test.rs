//! Tests for the parent-link lifecycle and snapshot (de)serialization.

use generational_arena::Index;
use rstest::{fixture, rstest};

use rstree::util::testing::init_test_setup;
use rstree::{Snapshot, TreeArena, TreeError};

fn last_child(tree: &TreeArena, parent: Index) -> Index {
    *tree
        .get_node(parent)
        .expect("parent must exist")
        .children
        .last()
        .expect("parent must have children")
}

/// root
/// ├── left
/// │   ├── leaf1
/// │   └── leaf2
/// └── right
#[fixture]
fn labeled_tree() -> TreeArena {
    init_test_setup();

    let mut tree = TreeArena::new();
    let root = tree.root();

    tree.insert_child(root);
    let left = last_child(&tree, root);
    tree.insert_child(root);
    let right = last_child(&tree, root);
    tree.insert_child(left);
    let leaf1 = last_child(&tree, left);
    tree.insert_child(left);
    let leaf2 = last_child(&tree, left);

    for (idx, label) in [
        (left, "left"),
        (right, "right"),
        (leaf1, "leaf1"),
        (leaf2, "leaf2"),
    ] {
        tree.get_node_mut(idx).unwrap().label = label.to_string();
    }

    tree
}

/// Parent link of every node, in breadth-first order.
fn parent_links(tree: &TreeArena) -> Vec<Option<Index>> {
    tree.iter().map(|(_, node)| node.parent).collect()
}

// ============================================================
// Link passes
// ============================================================

#[rstest]
fn given_materialized_tree_when_dematerializing_then_every_parent_link_is_cleared(
    labeled_tree: TreeArena,
) {
    let mut tree = labeled_tree;

    tree.dematerialize_parents();

    assert!(tree.iter().all(|(_, node)| node.parent.is_none()));
}

#[rstest]
fn given_dematerialized_tree_when_materializing_then_links_match_structure(
    labeled_tree: TreeArena,
) {
    let mut tree = labeled_tree;
    tree.dematerialize_parents();

    // Act
    tree.materialize_parents();

    // Assert: each child points back at exactly its parent, root at nothing
    let pairs: Vec<(Index, Index)> = tree
        .iter()
        .flat_map(|(idx, node)| node.children.iter().map(move |&child| (idx, child)))
        .collect();
    for (parent, child) in pairs {
        assert_eq!(tree.get_node(child).unwrap().parent, Some(parent));
    }
    assert!(tree.get_node(tree.root()).unwrap().parent.is_none());
}

#[rstest]
fn given_tree_when_repeating_link_passes_then_result_is_idempotent(labeled_tree: TreeArena) {
    let mut tree = labeled_tree;

    tree.materialize_parents();
    let once = parent_links(&tree);

    // materialize; dematerialize; materialize must equal a single pass
    tree.dematerialize_parents();
    tree.materialize_parents();
    assert_eq!(parent_links(&tree), once);

    // and each pass is idempotent on its own
    tree.materialize_parents();
    assert_eq!(parent_links(&tree), once);
    tree.dematerialize_parents();
    tree.dematerialize_parents();
    assert!(tree.iter().all(|(_, node)| node.parent.is_none()));
}

// ============================================================
// Snapshot round-trips
// ============================================================

#[rstest]
fn given_tree_when_round_tripping_through_snapshot_then_shape_is_preserved(
    labeled_tree: TreeArena,
) {
    let mut tree = labeled_tree;

    tree.dematerialize_parents();
    let snapshot = tree.to_snapshot();

    let restored = TreeArena::from_snapshot(snapshot.clone());

    assert_eq!(restored.to_snapshot(), snapshot);
    assert_eq!(restored.node_count(), tree.node_count());
    assert_eq!(restored.depth(), tree.depth());
}

#[rstest]
fn given_snapshot_when_encoding_to_json_then_payload_carries_no_parent_field(
    labeled_tree: TreeArena,
) {
    let mut tree = labeled_tree;
    tree.dematerialize_parents();

    let payload = tree.to_snapshot().to_json().unwrap();

    assert!(payload.contains("\"label\""));
    assert!(payload.contains("\"children\""));
    assert!(!payload.contains("parent"));
}

#[rstest]
fn given_json_payload_when_decoding_then_tree_rebuilds_and_is_editable_after_materializing() {
    init_test_setup();

    let payload = r#"{
        "label": "",
        "children": [
            {"label": "alpha", "children": [
                {"label": "alpha-child", "children": []}
            ]},
            {"label": "beta", "children": []}
        ]
    }"#;

    // Act: decode, rebuild, relink
    let snapshot = Snapshot::from_json(payload).unwrap();
    let mut tree = TreeArena::from_snapshot(snapshot);
    assert!(tree.iter().all(|(_, node)| node.parent.is_none()));
    tree.materialize_parents();

    // Assert: fully functional for editing
    let root = tree.root();
    let alpha = tree.get_node(root).unwrap().children[0];
    assert_eq!(tree.get_node(alpha).unwrap().label, "alpha");
    assert_eq!(tree.get_node(alpha).unwrap().parent, Some(root));

    assert!(tree.insert_sibling(alpha));
    assert_eq!(tree.get_node(root).unwrap().children.len(), 3);
}

#[rstest]
fn given_malformed_payload_when_decoding_then_decode_error_is_reported() {
    init_test_setup();

    let result = Snapshot::from_json("{\"label\": 42}");

    assert!(matches!(result, Err(TreeError::Decode(_))));
}

// ============================================================
// Mutation in the dematerialized state
// ============================================================

// The engine does not police the link-state contract. The structural
// mutations only walk child lists, never the parent link, so they keep
// working on a dematerialized tree; the next materialize pass restores
// full consistency.
#[rstest]
fn given_dematerialized_tree_when_mutating_then_structure_is_still_editable(
    labeled_tree: TreeArena,
) {
    let mut tree = labeled_tree;
    let root = tree.root();
    tree.dematerialize_parents();

    // Act
    assert!(tree.insert_child(root));
    let newest = last_child(&tree, root);
    let left = tree.get_node(root).unwrap().children[0];
    assert!(tree.remove(left));

    // Inserts record their attachment point even in this state.
    assert_eq!(tree.get_node(newest).unwrap().parent, Some(root));

    // Relinking afterwards yields a fully consistent materialized tree.
    tree.materialize_parents();
    for (idx, node) in tree.iter() {
        for &child in &node.children {
            assert_eq!(tree.get_node(child).unwrap().parent, Some(idx));
        }
    }
}

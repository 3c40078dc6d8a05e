//! Child generation and lazy expansion.

use mandala_core::{Node, NodeId, TreeError, TreeId, TreeShape};
use tracing::{debug, info};
use crate::store::NodeStore;

/// Result of creating a new tree.
#[derive(Debug, Clone)]
pub struct GeneratedTree {
    /// The level-1 root
    pub root: Node,

    /// Every generated node, root included, shallowest level first
    pub all_generated: Vec<Node>,
}

/// Default title for the child at `index` of a node titled `parent_title`.
pub fn placeholder_title(parent_title: &str, index: u8) -> String {
    format!("{} - Task {}", parent_title, index as u32 + 1)
}

/// Generate `shape.fanout` children for `parent`.
///
/// Returns an empty list when `parent` sits at or below `shape.max_level`.
/// The caller is responsible for only calling this on unexpanded nodes; use
/// [`expand_node`] to get the at-most-once behavior.
pub fn generate_children(parent: &Node, shape: &TreeShape) -> Vec<Node> {
    if !shape.can_expand(parent.level) {
        return Vec::new();
    }

    (0..shape.fanout)
        .map(|index| Node::child_of(parent, index, placeholder_title(&parent.title, index)))
        .collect()
}

/// Create a new tree, generating every level down to `initial_depth`.
///
/// `initial_depth` is clamped to `1..=shape.max_level`.
pub fn create_tree(
    title: impl Into<String>,
    initial_depth: u8,
    shape: &TreeShape,
) -> Result<GeneratedTree, TreeError> {
    shape.validate()?;
    let depth = initial_depth.clamp(1, shape.max_level);

    let root = Node::root(TreeId::new(), title);
    let mut all_generated = Vec::new();
    all_generated.push(root.clone());

    let mut frontier = 0..all_generated.len();
    for _ in 1..depth {
        let start = all_generated.len();
        for i in frontier {
            let children = generate_children(&all_generated[i], shape);
            all_generated.extend(children);
        }
        frontier = start..all_generated.len();
    }

    info!(
        "Created tree {} with {} nodes (depth {})",
        root.tree_id,
        all_generated.len(),
        depth
    );

    Ok(GeneratedTree { root, all_generated })
}

/// Lazily expand a node.
///
/// Returns the existing children unchanged if there are any, otherwise
/// generates and stores a full set. Terminal nodes yield an empty list.
pub fn expand_node<S: NodeStore>(
    store: &mut S,
    id: NodeId,
    shape: &TreeShape,
) -> Result<Vec<Node>, TreeError> {
    let node = store.node(id).cloned().ok_or(TreeError::NodeNotFound(id))?;

    let existing = store.children(id);
    if !existing.is_empty() {
        debug!("Node {} already expanded ({} children)", id, existing.len());
        return Ok(existing);
    }

    if !shape.can_expand(node.level) {
        debug!("Node {} is at max level {}, not expanding", id, shape.max_level);
        return Ok(Vec::new());
    }

    let children = generate_children(&node, shape);
    match store.insert_children(id, children.clone()) {
        Ok(()) => {
            debug!("Expanded node {} with {} children", id, children.len());
            Ok(children)
        }
        // someone else expanded it first; theirs win
        Err(TreeError::AlreadyExpanded(_)) => Ok(store.children(id)),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TreeArena;
    use std::collections::HashSet;

    #[test]
    fn test_generate_children_invariants() {
        let shape = TreeShape::default();
        let root = Node::root(TreeId::new(), "Become a pro player");

        let children = generate_children(&root, &shape);

        assert_eq!(children.len(), 8);
        let indices: Vec<u8> = children.iter().map(|c| c.index_in_parent).collect();
        assert_eq!(indices, (0..8).collect::<Vec<u8>>());
        for child in &children {
            assert_eq!(child.level, 2);
            assert_eq!(child.parent_id, Some(root.id));
            assert_eq!(child.status, mandala_core::NodeStatus::InProgress);
        }
        assert_eq!(children[0].title, "Become a pro player - Task 1");
        assert_eq!(children[7].title, "Become a pro player - Task 8");
    }

    #[test]
    fn test_generate_children_at_max_level_is_empty() {
        let shape = TreeShape::default();
        let mut leaf = Node::root(TreeId::new(), "Leaf");
        leaf.level = shape.max_level;
        assert!(generate_children(&leaf, &shape).is_empty());
    }

    #[test]
    fn test_generate_children_custom_fanout() {
        let shape = TreeShape { fanout: 3, ..Default::default() };
        let root = Node::root(TreeId::new(), "Root");
        assert_eq!(generate_children(&root, &shape).len(), 3);
    }

    #[test]
    fn test_create_tree_depth_three_has_73_nodes() {
        let shape = TreeShape::default();
        let tree = create_tree("Goal", 3, &shape).unwrap();

        assert_eq!(tree.all_generated.len(), 73);
        assert_eq!(tree.root.level, 1);
        assert_eq!(tree.root.index_in_parent, 0);
        assert!(tree.root.parent_id.is_none());
        assert_eq!(tree.all_generated.iter().filter(|n| n.level == 3).count(), 64);

        let ids: HashSet<_> = tree.all_generated.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 73);
        assert!(tree.all_generated.iter().all(|n| n.tree_id == tree.root.tree_id));
    }

    #[test]
    fn test_create_tree_clamps_depth() {
        let shape = TreeShape { fanout: 2, max_level: 3, checklist_level: 3, ..Default::default() };
        let tree = create_tree("Goal", 10, &shape).unwrap();
        assert_eq!(tree.all_generated.len(), 1 + 2 + 4);

        let tree = create_tree("Goal", 0, &shape).unwrap();
        assert_eq!(tree.all_generated.len(), 1);
    }

    #[test]
    fn test_create_tree_rejects_invalid_shape() {
        let shape = TreeShape { fanout: 0, ..Default::default() };
        assert!(matches!(
            create_tree("Goal", 3, &shape),
            Err(TreeError::Shape(mandala_core::ShapeError::ZeroFanout))
        ));
    }

    #[test]
    fn test_expand_node_is_idempotent() {
        let shape = TreeShape::default();
        let tree = create_tree("Goal", 3, &shape).unwrap();
        let mut arena = TreeArena::from_nodes(tree.all_generated);
        let level3 = arena.nodes().iter().find(|n| n.level == 3).unwrap().id;

        let first = expand_node(&mut arena, level3, &shape).unwrap();
        let second = expand_node(&mut arena, level3, &shape).unwrap();

        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
        assert_eq!(arena.len(), 73 + 8);
    }

    #[test]
    fn test_expand_node_returns_existing_children() {
        let shape = TreeShape::default();
        let tree = create_tree("Goal", 2, &shape).unwrap();
        let root_id = tree.root.id;
        let existing: Vec<_> = tree.all_generated[1..].to_vec();
        let mut arena = TreeArena::from_nodes(tree.all_generated);

        let children = expand_node(&mut arena, root_id, &shape).unwrap();
        assert_eq!(children, existing);
        assert_eq!(arena.len(), 9);
    }

    #[test]
    fn test_expand_terminal_node_is_noop() {
        let shape = TreeShape { max_level: 2, blocking_level: 2, checklist_level: 2, initial_depth: 2, ..Default::default() };
        let tree = create_tree("Goal", 2, &shape).unwrap();
        let leaf = tree.all_generated[1].id;
        let mut arena = TreeArena::from_nodes(tree.all_generated);

        assert!(expand_node(&mut arena, leaf, &shape).unwrap().is_empty());
        assert_eq!(arena.len(), 9);
    }

    /// A store where another writer expands the node between the
    /// children lookup and the insert.
    struct RacingStore {
        arena: TreeArena,
        children_calls: std::cell::Cell<usize>,
        inserts: usize,
    }

    impl NodeStore for RacingStore {
        fn node(&self, id: NodeId) -> Option<&Node> {
            self.arena.node(id)
        }

        fn children(&self, id: NodeId) -> Vec<Node> {
            let calls = self.children_calls.get();
            self.children_calls.set(calls + 1);
            if calls == 0 {
                Vec::new()
            } else {
                self.arena.children(id)
            }
        }

        fn insert_children(&mut self, parent: NodeId, children: Vec<Node>) -> Result<(), TreeError> {
            self.inserts += 1;
            self.arena.insert_children(parent, children)
        }
    }

    #[test]
    fn test_expand_node_yields_to_concurrent_expansion() {
        let shape = TreeShape::default();
        let (root_id, arena) = TreeArena::create("Goal", 2, &shape).unwrap();
        let stored = arena.children(root_id);
        let mut store = RacingStore {
            arena,
            children_calls: std::cell::Cell::new(0),
            inserts: 0,
        };

        let children = expand_node(&mut store, root_id, &shape).unwrap();

        assert_eq!(children, stored);
        assert_eq!(store.inserts, 1);
        assert_eq!(store.arena.len(), 9);
    }

    #[test]
    fn test_expand_unknown_node() {
        let mut arena = TreeArena::default();
        let missing = NodeId::new();
        assert_eq!(
            expand_node(&mut arena, missing, &TreeShape::default()),
            Err(TreeError::NodeNotFound(missing))
        );
    }
}

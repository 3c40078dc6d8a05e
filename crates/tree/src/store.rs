//! Node store abstraction and the in-memory arena.

use std::collections::HashMap;
use mandala_core::{Expansion, Node, NodeId, TreeError, TreeIndex, TreeShape};
use crate::generator::{create_tree, GeneratedTree};

/// Storage seam used by [`expand_node`](crate::expand_node).
///
/// A persistent backend implements this over its own tables. `insert_children`
/// is the conditional insert that guards against two expansions of the same
/// node racing: it must refuse with [`TreeError::AlreadyExpanded`] when the
/// parent already has children.
pub trait NodeStore {
    /// Look up a node.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Children of a node, ordered by `index_in_parent`.
    fn children(&self, id: NodeId) -> Vec<Node>;

    /// Insert a full child set for `parent`, unless it already has children.
    fn insert_children(&mut self, parent: NodeId, children: Vec<Node>) -> Result<(), TreeError>;
}

/// Flat, indexed collection of nodes.
///
/// Nodes live in one `Vec`; navigation goes through the id and parent maps
/// instead of pointers between nodes.
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    children: HashMap<NodeId, Vec<usize>>,
}

impl TreeArena {
    /// Create an arena from an existing node list.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut arena = Self::default();
        for node in nodes {
            arena.push(node);
        }
        arena.sort_children();
        arena
    }

    /// Create a new tree and load it into an arena.
    pub fn create(
        title: impl Into<String>,
        initial_depth: u8,
        shape: &TreeShape,
    ) -> Result<(NodeId, Self), TreeError> {
        let GeneratedTree { root, all_generated } = create_tree(title, initial_depth, shape)?;
        Ok((root.id, Self::from_nodes(all_generated)))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consume the arena, returning its nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Look up a node mutably, e.g. to change its status.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let pos = *self.positions.get(&id)?;
        self.nodes.get_mut(pos)
    }

    /// Expansion state of a node, `None` if unknown.
    pub fn expansion(&self, id: NodeId, shape: &TreeShape) -> Option<Expansion> {
        let node = self.node(id)?;
        let count = self.children.get(&id).map_or(0, Vec::len);
        Some(Expansion::of(node.level, count, shape))
    }

    /// Borrowed index for ancestor walks and render ordering.
    pub fn index(&self) -> TreeIndex<'_> {
        TreeIndex::new(&self.nodes)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) {
        let pos = self.nodes.len();
        self.positions.insert(node.id, pos);
        if let Some(parent_id) = node.parent_id {
            self.children.entry(parent_id).or_default().push(pos);
        }
        self.nodes.push(node);
    }

    fn sort_children(&mut self) {
        let nodes = &self.nodes;
        for siblings in self.children.values_mut() {
            siblings.sort_by_key(|&pos| nodes[pos].index_in_parent);
        }
    }
}

impl NodeStore for TreeArena {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }

    fn children(&self, id: NodeId) -> Vec<Node> {
        self.children
            .get(&id)
            .map(|positions| positions.iter().map(|&pos| self.nodes[pos].clone()).collect())
            .unwrap_or_default()
    }

    fn insert_children(&mut self, parent: NodeId, children: Vec<Node>) -> Result<(), TreeError> {
        if !self.positions.contains_key(&parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        if self.children.get(&parent).is_some_and(|c| !c.is_empty()) {
            return Err(TreeError::AlreadyExpanded(parent));
        }

        for child in children {
            self.push(child);
        }
        self.sort_children();
        Ok(())
    }
}

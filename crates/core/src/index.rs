//! Borrowed lookup structure over a flat node list.

use std::collections::{BTreeMap, HashMap};
use crate::id::NodeId;
use crate::node::{Expansion, Node};
use crate::shape::TreeShape;

/// Id and parent maps over a slice of nodes.
///
/// Children are kept in `index_in_parent` order. Nodes whose parent is not
/// part of the slice are treated as roots, so a partial subtree can be
/// indexed just like a whole tree.
pub struct TreeIndex<'a> {
    by_id: HashMap<NodeId, &'a Node>,
    children: HashMap<NodeId, Vec<&'a Node>>,
    roots: Vec<&'a Node>,
}

impl<'a> TreeIndex<'a> {
    /// Build the maps in one pass over `nodes`.
    pub fn new(nodes: &'a [Node]) -> Self {
        let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();
        let mut children: HashMap<NodeId, Vec<&Node>> = HashMap::new();
        let mut roots = Vec::new();

        for node in nodes {
            match node.parent_id {
                Some(parent_id) if by_id.contains_key(&parent_id) => {
                    children.entry(parent_id).or_default().push(node);
                }
                _ => roots.push(node),
            }
        }

        for siblings in children.values_mut() {
            siblings.sort_by_key(|n| n.index_in_parent);
        }
        roots.sort_by_key(|n| (n.level, n.index_in_parent, n.id));

        Self { by_id, children, roots }
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&'a Node> {
        self.by_id.get(&id).copied()
    }

    /// Children of a node in sibling order.
    pub fn children(&self, id: NodeId) -> &[&'a Node] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes with no parent in this index.
    pub fn roots(&self) -> &[&'a Node] {
        &self.roots
    }

    /// Ancestor chain ordered root → parent.
    ///
    /// The walk stops at the first parent missing from the index.
    pub fn ancestors(&self, node: &Node) -> Vec<&'a Node> {
        let mut chain = Vec::new();
        let mut current = node.parent_id;
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            // parent levels strictly decrease; a longer chain means a cycle
            if chain.len() >= node.level as usize {
                break;
            }
            chain.push(parent);
            current = parent.parent_id;
        }
        chain.reverse();
        chain
    }

    /// Nodes grouped by level, shallowest first.
    pub fn by_level(&self) -> BTreeMap<u8, Vec<&'a Node>> {
        let mut levels: BTreeMap<u8, Vec<&Node>> = BTreeMap::new();
        for node in self.by_id.values() {
            levels.entry(node.level).or_default().push(node);
        }
        levels
    }

    /// Expansion state of a node.
    pub fn expansion(&self, node: &Node, shape: &TreeShape) -> Expansion {
        Expansion::of(node.level, self.children(node.id).len(), shape)
    }

    /// Depth-first pre-order, siblings by `index_in_parent`.
    pub fn render_order(&self) -> Vec<&'a Node> {
        let mut ordered = Vec::with_capacity(self.by_id.len());
        let mut stack: Vec<&Node> = self.roots.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if ordered.len() >= self.by_id.len() {
                break;
            }
            ordered.push(node);
            stack.extend(self.children(node.id).iter().rev().copied());
        }
        ordered
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

//! Structural invariant checks over a flat node list.

use std::collections::{HashMap, HashSet};
use mandala_core::{Node, NodeId, TreeId, TreeIndex, TreeShape};
use tracing::warn;

/// A broken structural rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// A tree must have exactly one level-1 root without parent
    #[error("tree {tree_id} has {count} roots")]
    RootCount {
        /// Offending tree
        tree_id: TreeId,
        /// Roots found
        count: usize,
    },

    /// A root must sit at level 1
    #[error("root {0} is not at level 1")]
    RootLevel(NodeId),

    /// Parent id refers to nothing
    #[error("node {node} references missing parent {parent}")]
    MissingParent {
        /// Orphaned node
        node: NodeId,
        /// Missing parent id
        parent: NodeId,
    },

    /// Parent is in a different tree
    #[error("node {0} belongs to a different tree than its parent")]
    TreeMismatch(NodeId),

    /// `parent.level + 1 != level`
    #[error("node {node} at level {level} has parent at level {parent_level}")]
    LevelGap {
        /// Offending node
        node: NodeId,
        /// Its level
        level: u8,
        /// Parent's level
        parent_level: u8,
    },

    /// Deeper than the shape allows
    #[error("node {node} at level {level} exceeds max level {max_level}")]
    TooDeep {
        /// Offending node
        node: NodeId,
        /// Its level
        level: u8,
        /// Configured max
        max_level: u8,
    },

    /// An expanded node must have exactly `fanout` children indexed `0..fanout`
    #[error("node {node} has children indexed {indices:?}, expected 0..{fanout}")]
    BadChildSet {
        /// Parent node
        node: NodeId,
        /// Sibling indices found, sorted
        indices: Vec<u8>,
        /// Configured fanout
        fanout: u8,
    },
}

/// Check every structural rule, collecting all violations.
pub fn check_invariants(nodes: &[Node], shape: &TreeShape) -> Result<(), Vec<InvariantViolation>> {
    let mut violations = Vec::new();
    let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();

    let mut roots_per_tree: HashMap<TreeId, usize> = HashMap::new();
    for node in nodes {
        roots_per_tree.entry(node.tree_id).or_insert(0);

        if node.level > shape.max_level {
            violations.push(InvariantViolation::TooDeep {
                node: node.id,
                level: node.level,
                max_level: shape.max_level,
            });
        }

        match node.parent_id {
            None => {
                *roots_per_tree.entry(node.tree_id).or_insert(0) += 1;
                if node.level != 1 {
                    violations.push(InvariantViolation::RootLevel(node.id));
                }
            }
            Some(parent_id) => match by_id.get(&parent_id) {
                None => violations.push(InvariantViolation::MissingParent {
                    node: node.id,
                    parent: parent_id,
                }),
                Some(parent) => {
                    if parent.tree_id != node.tree_id {
                        violations.push(InvariantViolation::TreeMismatch(node.id));
                    }
                    if parent.level.checked_add(1) != Some(node.level) {
                        violations.push(InvariantViolation::LevelGap {
                            node: node.id,
                            level: node.level,
                            parent_level: parent.level,
                        });
                    }
                }
            },
        }
    }

    let mut trees: Vec<_> = roots_per_tree.into_iter().filter(|(_, c)| *c != 1).collect();
    trees.sort();
    for (tree_id, count) in trees {
        violations.push(InvariantViolation::RootCount { tree_id, count });
    }

    let index = TreeIndex::new(nodes);
    let expected: HashSet<u8> = (0..shape.fanout).collect();
    for node in nodes {
        let children = index.children(node.id);
        if children.is_empty() {
            continue;
        }
        let indices: Vec<u8> = children.iter().map(|c| c.index_in_parent).collect();
        let distinct: HashSet<u8> = indices.iter().copied().collect();
        if indices.len() != shape.fanout as usize || distinct != expected {
            violations.push(InvariantViolation::BadChildSet {
                node: node.id,
                indices,
                fanout: shape.fanout,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        warn!("Found {} invariant violations", violations.len());
        Err(violations)
    }
}

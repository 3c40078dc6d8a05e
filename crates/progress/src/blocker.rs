//! Inherited blocking.
//!
//! Exactly one level of the tree (`TreeShape::blocking_level`) can lock its
//! descendants. A node is inherited-blocked when the ancestor at that level
//! in its own lineage has status `blocked`. A blocked node at any other level
//! only affects itself.

use mandala_core::{Node, NodeStatus, TreeShape};

/// Resolves inherited blocking for a fixed blocking level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingResolver {
    blocking_level: u8,
}

impl BlockingResolver {
    /// Create a resolver for the given blocking level.
    pub fn new(blocking_level: u8) -> Self {
        Self { blocking_level }
    }

    /// Create a resolver from a tree shape.
    pub fn from_shape(shape: &TreeShape) -> Self {
        Self::new(shape.blocking_level)
    }

    /// The level whose status is inherited.
    pub fn blocking_level(&self) -> u8 {
        self.blocking_level
    }

    /// Whether `node` is locked by its ancestor at the blocking level.
    ///
    /// `ancestors` may be in any order and may be partial; if no ancestor at
    /// the blocking level is present the node is not blocked.
    pub fn is_inherited_blocked(&self, node: &Node, ancestors: &[&Node]) -> bool {
        if node.level <= self.blocking_level {
            return false;
        }

        ancestors
            .iter()
            .find(|a| a.level == self.blocking_level)
            .is_some_and(|a| a.status == NodeStatus::Blocked)
    }
}

impl Default for BlockingResolver {
    fn default() -> Self {
        Self::from_shape(&TreeShape::default())
    }
}

/// Whether `node` is locked by its ancestor at `shape.blocking_level`.
pub fn is_inherited_blocked(node: &Node, ancestors: &[&Node], shape: &TreeShape) -> bool {
    BlockingResolver::from_shape(shape).is_inherited_blocked(node, ancestors)
}

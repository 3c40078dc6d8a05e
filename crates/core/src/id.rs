//! Unique identifiers for mandala entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a goal tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TreeId(Ulid);

impl TreeId {
    /// Generate a new TreeId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TreeId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a node in a goal tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(Ulid);

impl NodeId {
    /// Generate a new NodeId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for NodeId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChecklistItemId(Ulid);

impl ChecklistItemId {
    /// Generate a new ChecklistItemId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ChecklistItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChecklistItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

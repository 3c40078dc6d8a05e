//! Node model - a single cell of the goal tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{NodeId, TreeId};
use crate::shape::TreeShape;
use crate::Time;

/// A vertex in a fixed-depth goal tree.
///
/// Nodes are stored flat and linked by `parent_id`; the tree structure is
/// recovered through id and parent maps rather than owned child pointers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Tree this node belongs to
    pub tree_id: TreeId,

    /// Parent node, `None` only for the root
    pub parent_id: Option<NodeId>,

    /// Depth, 1 = root
    pub level: u8,

    /// Position among siblings, `0..fanout`
    pub index_in_parent: u8,

    /// Title
    pub title: String,

    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,

    /// Own status
    pub status: NodeStatus,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Reminder settings, passed through untouched
    #[serde(default)]
    pub reminder: Option<Reminder>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Node {
    /// Create the root node of a new tree.
    pub fn root(tree_id: TreeId, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: NodeId::new(),
            tree_id,
            parent_id: None,
            level: 1,
            index_in_parent: 0,
            title: title.into(),
            description: None,
            status: NodeStatus::InProgress,
            due_date: None,
            reminder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a child of `parent` at the given sibling index.
    pub fn child_of(parent: &Node, index_in_parent: u8, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: NodeId::new(),
            tree_id: parent.tree_id,
            parent_id: Some(parent.id),
            level: parent.level + 1,
            index_in_parent,
            title: title.into(),
            description: None,
            status: NodeStatus::InProgress,
            due_date: None,
            reminder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status, touching `updated_at`.
    pub fn set_status(&mut self, status: NodeStatus) {
        self.status = status;
        self.updated_at = chrono::Utc::now();
    }

    /// Whether this is a tree root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Reminder settings owned by the delivery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Whether reminders are sent
    pub enabled: bool,

    /// Next scheduled send
    #[serde(default)]
    pub next_send_at: Option<Time>,
}

/// Node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Finished
    Done,
    /// Being worked on
    InProgress,
    /// Cannot proceed
    Blocked,
}

impl NodeStatus {
    /// Progress contribution of a leaf with this status.
    pub fn weight(self) -> f64 {
        match self {
            NodeStatus::Done => 1.0,
            NodeStatus::InProgress => 0.5,
            NodeStatus::Blocked => 0.0,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Done => "done",
            NodeStatus::InProgress => "in_progress",
            NodeStatus::Blocked => "blocked",
        }
    }
}

/// Whether a node has, may gain, or can never have children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// Children exist
    Expanded,
    /// Below max level but children not generated yet
    Pending,
    /// At max level; never has children
    Terminal,
}

impl Expansion {
    /// Classify a node given how many children it currently has.
    pub fn of(level: u8, child_count: usize, shape: &TreeShape) -> Self {
        if child_count > 0 {
            Expansion::Expanded
        } else if shape.can_expand(level) {
            Expansion::Pending
        } else {
            Expansion::Terminal
        }
    }

    /// Leaves take their progress from their own status.
    pub fn is_leaf(self) -> bool {
        !matches!(self, Expansion::Expanded)
    }
}

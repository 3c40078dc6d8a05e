//! Error types shared across the mandala crates.

use crate::id::{ChecklistItemId, NodeId};

/// Invalid tree shape configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Fanout must be at least one
    #[error("fanout must be at least 1")]
    ZeroFanout,

    /// Max level must be at least one
    #[error("max_level must be at least 1")]
    ZeroMaxLevel,

    /// A level setting falls outside `1..=max_level`
    #[error("{field} = {value} is outside 1..={max_level}")]
    LevelOutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: u8,
        /// Configured max level
        max_level: u8,
    },
}

/// Errors raised by tree generation and node stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No node with this id is known to the store
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The store refused to insert children for a node that already has them
    #[error("Node already expanded: {0}")]
    AlreadyExpanded(NodeId),

    /// Invalid shape
    #[error("Invalid tree shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Errors raised by checklist operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecklistError {
    /// Item is not part of this checklist
    #[error("Checklist item not found: {0}")]
    ItemNotFound(ChecklistItemId),

    /// Reorder input must name every current item exactly once
    #[error("Reorder expects {expected} distinct item ids, got {actual}")]
    ReorderMismatch {
        /// Number of items in the checklist
        expected: usize,
        /// Number of ids supplied
        actual: usize,
    },
}

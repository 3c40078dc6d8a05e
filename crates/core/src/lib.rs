//! Mandala core data models.
//!
//! This crate defines the records of a Harada-style goal tree: nodes, their
//! checklists, the tree shape configuration, and a borrowed index used to
//! navigate a flat node list.

#![warn(missing_docs)]

// Core identities
mod id;

// Tree records
mod node;
mod checklist;
mod shape;
mod index;

mod error;

// Re-exports
pub use id::*;

pub use node::{Node, NodeStatus, Expansion, Reminder};
pub use checklist::{Checklist, ChecklistItem, ChecklistStatus, checklist_progress};
pub use shape::TreeShape;
pub use index::TreeIndex;
pub use error::{ShapeError, TreeError, ChecklistError};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

//! Progress Tracking
//!
//! Inherited blocking and bottom-up progress aggregation over a goal tree.

#![warn(missing_docs)]

pub mod blocker;
pub mod aggregator;
pub mod tracker;

pub use blocker::{is_inherited_blocked, BlockingResolver};
pub use aggregator::compute_progress;
pub use tracker::{compute_tree_progress, ChecklistsByNode, NodeWithProgress, ProgressTracker, TreeProgress};

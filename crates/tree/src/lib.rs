//! Tree Generation
//!
//! Materializes goal-tree nodes under fixed-fanout, bounded-depth rules,
//! stores them in a flat arena, and checks structural invariants.

#![warn(missing_docs)]

pub mod generator;
pub mod store;
pub mod invariants;

pub use generator::{generate_children, create_tree, expand_node, placeholder_title, GeneratedTree};
pub use store::{NodeStore, TreeArena};
pub use invariants::{check_invariants, InvariantViolation};

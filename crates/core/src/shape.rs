//! Tree shape configuration.

use serde::{Deserialize, Serialize};
use crate::error::ShapeError;

/// Structural constants of a goal tree.
///
/// The defaults describe the classic mandala chart: one root goal, eight
/// sub-goals, eight actions per sub-goal, and one further lazily generated
/// level of tasks that may carry checklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    /// Children per expanded node
    pub fanout: u8,

    /// Deepest level; nodes here never have children
    pub max_level: u8,

    /// The only level whose `blocked` status is inherited by descendants
    pub blocking_level: u8,

    /// Level whose progress may be derived from checklist items
    pub checklist_level: u8,

    /// Depth generated eagerly when a tree is created
    pub initial_depth: u8,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            fanout: 8,
            max_level: 4,
            blocking_level: 2,
            checklist_level: 4,
            initial_depth: 3,
        }
    }
}

impl TreeShape {
    /// Check that every level setting lies within `1..=max_level`.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.fanout == 0 {
            return Err(ShapeError::ZeroFanout);
        }
        if self.max_level == 0 {
            return Err(ShapeError::ZeroMaxLevel);
        }

        for (field, value) in [
            ("blocking_level", self.blocking_level),
            ("checklist_level", self.checklist_level),
            ("initial_depth", self.initial_depth),
        ] {
            if value == 0 || value > self.max_level {
                return Err(ShapeError::LevelOutOfRange {
                    field,
                    value,
                    max_level: self.max_level,
                });
            }
        }

        Ok(())
    }

    /// Whether nodes at `level` may gain children.
    pub fn can_expand(&self, level: u8) -> bool {
        level < self.max_level
    }

    /// Number of nodes in a fully generated tree of the given depth.
    pub fn node_count(&self, depth: u8) -> usize {
        let depth = depth.min(self.max_level);
        (0..depth)
            .map(|k| (self.fanout as usize).checked_pow(k as u32).unwrap_or(usize::MAX))
            .fold(0usize, usize::saturating_add)
    }
}

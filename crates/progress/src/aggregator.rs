//! Per-node progress formula.

use mandala_core::{checklist_progress, ChecklistItem, Node, TreeShape};

/// Progress of one node in `[0, 1]`.
///
/// Rules, first match wins:
/// 1. inherited-blocked nodes report 0;
/// 2. nodes at the checklist level with at least one item report the mean
///    item weight;
/// 3. leaves (no children) report their own status weight;
/// 4. everything else reports the unweighted mean of its children.
pub fn compute_progress(
    node: &Node,
    children_progress: &[f64],
    inherited_blocked: bool,
    checklist: Option<&[ChecklistItem]>,
    shape: &TreeShape,
) -> f64 {
    if inherited_blocked {
        return 0.0;
    }

    if node.level == shape.checklist_level {
        if let Some(progress) = checklist.and_then(checklist_progress) {
            return progress;
        }
    }

    if children_progress.is_empty() {
        return node.status.weight();
    }

    children_progress.iter().sum::<f64>() / children_progress.len() as f64
}

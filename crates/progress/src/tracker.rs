//! Whole-tree progress evaluation.

use chrono::{DateTime, Utc};
use mandala_core::{ChecklistItem, Expansion, Node, NodeId, TreeIndex, TreeShape};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};
use crate::aggregator::compute_progress;
use crate::blocker::BlockingResolver;

/// Checklist items keyed by owning node.
pub type ChecklistsByNode = HashMap<NodeId, Vec<ChecklistItem>>;

/// Result of a whole-tree pass.
#[derive(Debug, Clone)]
pub struct TreeProgress {
    /// When the pass ran
    pub timestamp: DateTime<Utc>,

    /// Progress in `[0, 1]` by node
    pub progress: HashMap<NodeId, f64>,

    /// Nodes locked by their blocking-level ancestor
    pub inherited_blocked: HashSet<NodeId>,
}

impl TreeProgress {
    /// Progress of one node.
    pub fn progress_of(&self, id: NodeId) -> Option<f64> {
        self.progress.get(&id).copied()
    }

    /// Whether a node is inherited-blocked.
    pub fn is_inherited_blocked(&self, id: NodeId) -> bool {
        self.inherited_blocked.contains(&id)
    }
}

/// A node together with its derived, never-persisted values.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWithProgress {
    /// The node record
    pub node: Node,

    /// Progress in `[0, 1]`
    pub progress: f64,

    /// Locked by the blocking-level ancestor
    pub inherited_blocked: bool,

    /// Whether the node has, may gain, or can never have children
    pub expansion: Expansion,
}

/// Evaluates blocking and progress for a full node set.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    shape: TreeShape,
    resolver: BlockingResolver,
}

impl ProgressTracker {
    /// Create a tracker for the given shape.
    pub fn new(shape: TreeShape) -> Self {
        Self {
            shape,
            resolver: BlockingResolver::from_shape(&shape),
        }
    }

    /// The shape this tracker evaluates against.
    pub fn shape(&self) -> &TreeShape {
        &self.shape
    }

    /// Evaluate using the configured blocking level.
    pub fn evaluate(&self, nodes: &[Node], checklists: Option<&ChecklistsByNode>) -> TreeProgress {
        let resolver = self.resolver;
        self.evaluate_with(
            nodes,
            |node, ancestors| resolver.is_inherited_blocked(node, ancestors),
            checklists,
        )
    }

    /// Evaluate with a caller-supplied blocking rule.
    ///
    /// Levels are processed deepest first so every child's progress is final
    /// before its parent reads it.
    pub fn evaluate_with<F>(
        &self,
        nodes: &[Node],
        is_blocked: F,
        checklists: Option<&ChecklistsByNode>,
    ) -> TreeProgress
    where
        F: Fn(&Node, &[&Node]) -> bool,
    {
        let index = TreeIndex::new(nodes);
        let mut progress: HashMap<NodeId, f64> = HashMap::with_capacity(nodes.len());
        let mut inherited_blocked = HashSet::new();

        for (level, level_nodes) in index.by_level().into_iter().rev() {
            for &node in &level_nodes {
                let ancestors = index.ancestors(node);
                let blocked = is_blocked(node, ancestors.as_slice());
                if blocked {
                    inherited_blocked.insert(node.id);
                }

                let children: Vec<f64> = index
                    .children(node.id)
                    .iter()
                    .filter_map(|child| progress.get(&child.id).copied())
                    .collect();
                let items = checklists
                    .and_then(|by_node| by_node.get(&node.id))
                    .map(Vec::as_slice);

                let value = compute_progress(node, &children, blocked, items, &self.shape);
                progress.insert(node.id, value);
            }
            trace!("Resolved level {} ({} nodes)", level, level_nodes.len());
        }

        debug!(
            "Evaluated {} nodes, {} inherited-blocked",
            progress.len(),
            inherited_blocked.len()
        );

        TreeProgress {
            timestamp: Utc::now(),
            progress,
            inherited_blocked,
        }
    }

    /// Evaluate and attach derived values to each node, in render order.
    pub fn annotate(
        &self,
        nodes: &[Node],
        checklists: Option<&ChecklistsByNode>,
    ) -> Vec<NodeWithProgress> {
        let result = self.evaluate(nodes, checklists);
        self.annotate_from(nodes, &result)
    }

    /// Attach the values of an earlier pass over the same `nodes`.
    pub fn annotate_from(&self, nodes: &[Node], result: &TreeProgress) -> Vec<NodeWithProgress> {
        let index = TreeIndex::new(nodes);

        index
            .render_order()
            .into_iter()
            .map(|node| NodeWithProgress {
                node: node.clone(),
                progress: result.progress_of(node.id).unwrap_or(0.0),
                inherited_blocked: result.is_inherited_blocked(node.id),
                expansion: index.expansion(node, &self.shape),
            })
            .collect()
    }
}

/// Progress of every node, using `is_blocked` as the blocking rule.
pub fn compute_tree_progress<F>(
    nodes: &[Node],
    is_blocked: F,
    checklists: Option<&ChecklistsByNode>,
    shape: &TreeShape,
) -> HashMap<NodeId, f64>
where
    F: Fn(&Node, &[&Node]) -> bool,
{
    ProgressTracker::new(*shape)
        .evaluate_with(nodes, is_blocked, checklists)
        .progress
}

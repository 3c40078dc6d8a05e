//! Checklist items attached to nodes at the checklist level.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::error::ChecklistError;
use crate::id::{ChecklistItemId, NodeId};
use crate::Time;

/// A fine-grained sub-item of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Unique identifier
    pub id: ChecklistItemId,

    /// Owning node
    pub node_id: NodeId,

    /// Title
    pub title: String,

    /// Current status
    pub status: ChecklistStatus,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Dense, zero-based display order
    pub sort_order: u32,

    /// When created
    pub created_at: Time,
}

/// Checklist item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
    /// Cannot proceed
    Blocked,
}

impl ChecklistStatus {
    /// Progress contribution of an item with this status.
    pub fn weight(self) -> f64 {
        match self {
            ChecklistStatus::Done => 1.0,
            ChecklistStatus::InProgress => 0.5,
            ChecklistStatus::Todo | ChecklistStatus::Blocked => 0.0,
        }
    }
}

/// Mean item weight, or `None` for an empty list.
pub fn checklist_progress(items: &[ChecklistItem]) -> Option<f64> {
    if items.is_empty() {
        return None;
    }
    let total: f64 = items.iter().map(|item| item.status.weight()).sum();
    Some(total / items.len() as f64)
}

/// The ordered checklist of a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    /// Owning node
    pub node_id: NodeId,

    /// Items in `sort_order`
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Create an empty checklist for a node.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            items: Vec::new(),
        }
    }

    /// Rebuild from persisted items, ordering by `sort_order`.
    pub fn from_items(node_id: NodeId, mut items: Vec<ChecklistItem>) -> Self {
        items.retain(|item| item.node_id == node_id);
        items.sort_by_key(|item| item.sort_order);
        Self { node_id, items }
    }

    /// Append a new `todo` item at the end.
    pub fn add(&mut self, title: impl Into<String>) -> &ChecklistItem {
        let sort_order = self.items.len() as u32;
        self.items.push(ChecklistItem {
            id: ChecklistItemId::new(),
            node_id: self.node_id,
            title: title.into(),
            status: ChecklistStatus::Todo,
            due_date: None,
            sort_order,
            created_at: chrono::Utc::now(),
        });
        &self.items[self.items.len() - 1]
    }

    /// Change the status of one item.
    pub fn set_status(
        &mut self,
        id: ChecklistItemId,
        status: ChecklistStatus,
    ) -> Result<(), ChecklistError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ChecklistError::ItemNotFound(id))?;
        item.status = status;
        Ok(())
    }

    /// Permanently remove one item and close the gap in `sort_order`.
    pub fn remove(&mut self, id: ChecklistItemId) -> Result<ChecklistItem, ChecklistError> {
        let pos = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ChecklistError::ItemNotFound(id))?;
        let removed = self.items.remove(pos);
        self.renumber();
        Ok(removed)
    }

    /// Rewrite `sort_order` for the full set to follow `order`.
    ///
    /// `order` must be a permutation of the current item ids.
    pub fn reorder(&mut self, order: &[ChecklistItemId]) -> Result<(), ChecklistError> {
        let distinct: HashSet<_> = order.iter().copied().collect();
        if order.len() != self.items.len() || distinct.len() != order.len() {
            return Err(ChecklistError::ReorderMismatch {
                expected: self.items.len(),
                actual: distinct.len(),
            });
        }
        if let Some(missing) = order
            .iter()
            .find(|id| !self.items.iter().any(|item| item.id == **id))
        {
            return Err(ChecklistError::ItemNotFound(*missing));
        }

        let mut reordered = Vec::with_capacity(self.items.len());
        for id in order {
            let pos = self
                .items
                .iter()
                .position(|item| item.id == *id)
                .ok_or(ChecklistError::ItemNotFound(*id))?;
            reordered.push(self.items.swap_remove(pos));
        }
        self.items = reordered;
        self.renumber();
        Ok(())
    }

    /// Mean item weight, or `None` when there are no items.
    pub fn progress(&self) -> Option<f64> {
        checklist_progress(&self.items)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the checklist has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn renumber(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.sort_order = i as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist_with(statuses: &[ChecklistStatus]) -> Checklist {
        let mut checklist = Checklist::new(NodeId::new());
        for (i, status) in statuses.iter().enumerate() {
            let id = checklist.add(format!("Item {}", i + 1)).id;
            checklist.set_status(id, *status).unwrap();
        }
        checklist
    }

    #[test]
    fn test_progress_empty_is_none() {
        assert_eq!(Checklist::new(NodeId::new()).progress(), None);
    }

    #[test]
    fn test_progress_mean_of_weights() {
        let checklist = checklist_with(&[
            ChecklistStatus::Done,
            ChecklistStatus::InProgress,
            ChecklistStatus::Todo,
            ChecklistStatus::Blocked,
        ]);
        assert_eq!(checklist.progress(), Some(0.375));
    }

    #[test]
    fn test_add_assigns_dense_sort_order() {
        let checklist = checklist_with(&[ChecklistStatus::Todo; 3]);
        let orders: Vec<u32> = checklist.items.iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_renumbers_remaining() {
        let mut checklist = checklist_with(&[ChecklistStatus::Todo; 3]);
        let middle = checklist.items[1].id;

        let removed = checklist.remove(middle).unwrap();
        assert_eq!(removed.id, middle);
        assert_eq!(checklist.len(), 2);
        assert_eq!(checklist.items[1].sort_order, 1);
        assert_eq!(checklist.items[1].title, "Item 3");
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut checklist = checklist_with(&[ChecklistStatus::Todo]);
        let missing = ChecklistItemId::new();
        assert_eq!(checklist.remove(missing), Err(ChecklistError::ItemNotFound(missing)));
    }

    #[test]
    fn test_reorder_rewrites_full_set() {
        let mut checklist = checklist_with(&[ChecklistStatus::Todo; 3]);
        let ids: Vec<_> = checklist.items.iter().map(|i| i.id).collect();

        checklist.reorder(&[ids[2], ids[0], ids[1]]).unwrap();

        let titles: Vec<_> = checklist.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Item 3", "Item 1", "Item 2"]);
        let orders: Vec<u32> = checklist.items.iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_rejects_partial_permutation() {
        let mut checklist = checklist_with(&[ChecklistStatus::Todo; 3]);
        let ids: Vec<_> = checklist.items.iter().map(|i| i.id).collect();

        let err = checklist.reorder(&[ids[0], ids[0], ids[1]]).unwrap_err();
        assert_eq!(err, ChecklistError::ReorderMismatch { expected: 3, actual: 2 });
        // untouched on failure
        assert_eq!(checklist.items[0].id, ids[0]);
        assert_eq!(checklist.items[2].id, ids[2]);
    }

    #[test]
    fn test_from_items_sorts_and_filters() {
        let node_id = NodeId::new();
        let mut source = Checklist::new(node_id);
        source.add("a");
        source.add("b");
        let mut items = source.items.clone();
        items.reverse();
        let mut stray = items[0].clone();
        stray.node_id = NodeId::new();
        items.push(stray);

        let checklist = Checklist::from_items(node_id, items);
        assert_eq!(checklist.len(), 2);
        assert_eq!(checklist.items[0].title, "a");
    }
}

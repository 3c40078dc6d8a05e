//! JSON tree snapshots read and written by the CLI.

use anyhow::{Context, Result};
use mandala_core::{Checklist, Node, TreeShape};
use mandala_progress::ChecklistsByNode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// A serialized tree: nodes, their checklists, and optionally the shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Shape the tree was generated with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<TreeShape>,

    /// Every node of the tree
    pub nodes: Vec<Node>,

    /// Checklists of nodes at the checklist level
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl Snapshot {
    /// Read a snapshot from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Write the snapshot to disk as pretty JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json.as_bytes())
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// The stored shape, or `fallback` for snapshots saved without one.
    pub fn shape_or(&self, fallback: TreeShape) -> Result<TreeShape> {
        let shape = self.shape.unwrap_or(fallback);
        shape.validate()?;
        Ok(shape)
    }

    /// Checklist items keyed by node, sorted by `sort_order`.
    pub fn checklists_by_node(&self) -> ChecklistsByNode {
        self.checklists
            .iter()
            .map(|c| {
                let ordered = Checklist::from_items(c.node_id, c.items.clone());
                (c.node_id, ordered.items)
            })
            .collect()
    }
}

/// Load a shape file, falling back to the defaults.
pub async fn load_shape(path: Option<&Path>) -> Result<TreeShape> {
    let Some(path) = path else {
        return Ok(TreeShape::default());
    };
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading shape {}", path.display()))?;
    let shape: TreeShape = serde_json::from_str(&raw)?;
    shape.validate()?;
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandala_core::ChecklistStatus;
    use mandala_tree::create_tree;

    #[tokio::test]
    async fn test_snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let tree = create_tree("Goal", 2, &TreeShape::default()).unwrap();

        let mut checklist = Checklist::new(tree.root.id);
        let id = checklist.add("step").id;
        checklist.set_status(id, ChecklistStatus::Done).unwrap();

        let snapshot = Snapshot {
            shape: None,
            nodes: tree.all_generated,
            checklists: vec![checklist],
        };
        snapshot.save(&path).await.unwrap();

        let loaded = Snapshot::load(&path).await.unwrap();
        assert_eq!(loaded.nodes, snapshot.nodes);
        assert!(loaded.shape.is_none());
        let by_node = loaded.checklists_by_node();
        assert_eq!(by_node[&tree.root.id][0].status, ChecklistStatus::Done);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Snapshot::load(dir.path().join("absent.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_shape_defaults_and_validates() {
        assert_eq!(load_shape(None).await.unwrap(), TreeShape::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.json");
        tokio::fs::write(&path, r#"{"fanout": 4, "max_level": 3, "checklist_level": 3}"#)
            .await
            .unwrap();
        let shape = load_shape(Some(path.as_path())).await.unwrap();
        assert_eq!(shape.fanout, 4);

        tokio::fs::write(&path, r#"{"max_level": 2}"#).await.unwrap();
        assert!(load_shape(Some(path.as_path())).await.is_err());
    }
}

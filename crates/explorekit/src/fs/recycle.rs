//! Recycle bin entries and lookups.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::node::{Node, NodeType};
use crate::path;

/// A soft-deleted item.
///
/// Holds the deleted subtree with its ids intact, the path of the folder it
/// was deleted from, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycleEntry {
    #[serde(flatten)]
    pub item: Node,
    /// Path of the former parent folder
    #[serde(default)]
    pub original_path: String,
    /// RFC 3339 deletion timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl RecycleEntry {
    /// Entry for an item deleted now from `original_path`.
    pub fn new(item: Node, original_path: impl Into<String>) -> Self {
        Self {
            item,
            original_path: original_path.into(),
            deleted_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn node_type(&self) -> NodeType {
        self.item.node_type
    }

    /// Path the item had before deletion.
    ///
    /// `None` for malformed entries (no name or no original path).
    pub fn full_path(&self) -> Option<String> {
        if self.item.name.is_empty() || self.original_path.is_empty() {
            return None;
        }
        Some(path::normalize(&path::join(
            &self.original_path,
            &self.item.name,
        )))
    }
}

/// Deserialize a bin list, skipping entries that do not parse.
///
/// Malformed entries (no `type`, `null`, not an object) are dropped with a
/// debug log. A value that is not an array reads as an empty bin.
pub(crate) fn deserialize_bin<'de, D>(deserializer: D) -> Result<Vec<RecycleEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(raw) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let entries: Vec<RecycleEntry> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(_index, value)| match serde_json::from_value::<RecycleEntry>(value) {
            Ok(entry) => Some(entry),
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::debug!(index = _index, error = %_err, "skipping malformed recycle bin entry");
                None
            }
        })
        .collect();
    Ok(entries)
}

/// True if the bin holds an entry of `node_type` that was deleted from `target`.
pub fn bin_has_item(bin: &[RecycleEntry], node_type: NodeType, target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    let name = path::name(target);
    let Some(parent) = path::parent(target) else {
        return false;
    };
    if name.is_empty() {
        return false;
    }
    let parent = path::normalize(parent);
    bin.iter().any(|entry| {
        entry.node_type() == node_type
            && entry.name() == name
            && path::normalize(&entry.original_path) == parent
    })
}

/// True if some binned folder used to contain `target`.
pub fn bin_has_ancestor_folder(bin: &[RecycleEntry], target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    bin.iter()
        .filter(|entry| entry.node_type() == NodeType::Folder)
        .filter_map(RecycleEntry::full_path)
        .any(|folder| path::is_descendant(target, &folder))
}

//! Frozen copies of a tree plus its recycle bin.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::node::SystemRoot;
use super::recycle::{deserialize_bin, RecycleEntry};
use super::traits::LiveState;
use crate::error::Result;
use crate::flatten::{flatten, FlatFact};

/// One side of a diff: the tree and the bin at a point in time.
///
/// Snapshots own deep copies, so later mutation of the live session is never
/// observed by the diff pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub structure: SystemRoot,
    #[serde(default, deserialize_with = "deserialize_bin")]
    pub recycle_bin: Vec<RecycleEntry>,
}

impl Snapshot {
    pub fn new(structure: SystemRoot, recycle_bin: Vec<RecycleEntry>) -> Self {
        Self {
            structure,
            recycle_bin,
        }
    }

    /// Flat facts for the live tree.
    pub fn flatten(&self) -> Result<Vec<FlatFact>> {
        flatten(&self.structure)
    }

    /// Read a snapshot JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl LiveState for Snapshot {
    fn system(&self) -> &SystemRoot {
        &self.structure
    }

    fn recycle_bin(&self) -> &[RecycleEntry] {
        &self.recycle_bin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycle_bin_defaults_to_empty() {
        let json = r#"{"structure":{"roots":[{"name":"C:","type":"folder"}]}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.recycle_bin.is_empty());
        assert!(snapshot.folder_exists("C:"));
    }

    #[test]
    fn malformed_bin_entries_do_not_fail_the_load() {
        let json = r#"{
            "structure": {"roots": [{"name": "C:", "type": "folder", "children": [
                {"name": "Docs", "type": "folder"}
            ]}]},
            "recycleBin": [
                {"name": "old.txt", "originalPath": "C:\\Docs"},
                null,
                {"id": "k", "name": "keep.txt", "type": "file", "originalPath": "C:\\Docs"}
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.recycle_bin.len(), 1);
        assert_eq!(snapshot.recycle_bin[0].name(), "keep.txt");
    }

    #[test]
    fn accepts_legacy_structure() {
        let json = r#"{"structure":{"name":"C:","type":"folder","children":[{"name":"a.txt","type":"file"}]},"recycleBin":[]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.file_exists("C:\\a.txt"));
    }
}

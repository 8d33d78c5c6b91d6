//! Uniform diff records.

use serde::{Deserialize, Serialize};

use super::interpret::{CategorizedDiffs, DiffItem, PathChange};
use crate::fs::NodeType;

/// Diff record kind (wire names are kebab-case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    AddedFile,
    AddedFolder,
    RemovedFile,
    RemovedFolder,
    MovedFile,
    MovedFolder,
    RenamedFile,
    CopiedFile,
    CopiedFolder,
    RestoredFile,
    RestoredFolder,
    PermanentlyDeletedFile,
    PermanentlyDeletedFolder,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::AddedFile => "added-file",
            DiffKind::AddedFolder => "added-folder",
            DiffKind::RemovedFile => "removed-file",
            DiffKind::RemovedFolder => "removed-folder",
            DiffKind::MovedFile => "moved-file",
            DiffKind::MovedFolder => "moved-folder",
            DiffKind::RenamedFile => "renamed-file",
            DiffKind::CopiedFile => "copied-file",
            DiffKind::CopiedFolder => "copied-folder",
            DiffKind::RestoredFile => "restored-file",
            DiffKind::RestoredFolder => "restored-folder",
            DiffKind::PermanentlyDeletedFile => "permanently-deleted-file",
            DiffKind::PermanentlyDeletedFolder => "permanently-deleted-folder",
        }
    }

    /// Node type the record is about.
    pub fn node_type(&self) -> NodeType {
        match self {
            DiffKind::AddedFile
            | DiffKind::RemovedFile
            | DiffKind::MovedFile
            | DiffKind::RenamedFile
            | DiffKind::CopiedFile
            | DiffKind::RestoredFile
            | DiffKind::PermanentlyDeletedFile => NodeType::File,
            DiffKind::AddedFolder
            | DiffKind::RemovedFolder
            | DiffKind::MovedFolder
            | DiffKind::CopiedFolder
            | DiffKind::RestoredFolder
            | DiffKind::PermanentlyDeletedFolder => NodeType::Folder,
        }
    }

    fn pick(node_type: NodeType, file: DiffKind, folder: DiffKind) -> DiffKind {
        match node_type {
            NodeType::File => file,
            NodeType::Folder => folder,
        }
    }
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record points: one path, or a `from`/`to` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffTarget {
    Change { from: String, to: String },
    Path { path: String },
}

/// One classified change between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    #[serde(flatten)]
    pub target: DiffTarget,
    pub name: String,
}

impl DiffRecord {
    pub fn at(kind: DiffKind, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            target: DiffTarget::Path { path: path.into() },
            name: name.into(),
        }
    }

    pub fn change(
        kind: DiffKind,
        from: impl Into<String>,
        to: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target: DiffTarget::Change {
                from: from.into(),
                to: to.into(),
            },
            name: name.into(),
        }
    }

    /// Single path for path-shaped records.
    pub fn path(&self) -> Option<&str> {
        match &self.target {
            DiffTarget::Path { path } => Some(path),
            DiffTarget::Change { .. } => None,
        }
    }

    /// `(from, to)` for change-shaped records.
    pub fn from_to(&self) -> Option<(&str, &str)> {
        match &self.target {
            DiffTarget::Change { from, to } => Some((from, to)),
            DiffTarget::Path { .. } => None,
        }
    }
}

/// Flatten categorized diffs into records, category by category.
///
/// Order: added, removed, permanently deleted, moved files, moved folders,
/// renamed, copied, restored, deleted from the bin.
pub fn normalize(diffs: CategorizedDiffs) -> Vec<DiffRecord> {
    let mut records = Vec::with_capacity(diffs.len());

    let items = |records: &mut Vec<DiffRecord>, list: Vec<DiffItem>, file, folder| {
        records.extend(list.into_iter().map(|i| {
            DiffRecord::at(DiffKind::pick(i.node_type, file, folder), i.path, i.name)
        }));
    };
    let changes = |records: &mut Vec<DiffRecord>, list: Vec<PathChange>, file, folder| {
        records.extend(list.into_iter().map(|c| {
            DiffRecord::change(DiffKind::pick(c.node_type, file, folder), c.from, c.to, c.name)
        }));
    };

    items(&mut records, diffs.added, DiffKind::AddedFile, DiffKind::AddedFolder);
    items(&mut records, diffs.removed, DiffKind::RemovedFile, DiffKind::RemovedFolder);
    items(
        &mut records,
        diffs.removed_permanent,
        DiffKind::PermanentlyDeletedFile,
        DiffKind::PermanentlyDeletedFolder,
    );
    changes(&mut records, diffs.moved_files, DiffKind::MovedFile, DiffKind::MovedFolder);
    changes(&mut records, diffs.moved_folders, DiffKind::MovedFile, DiffKind::MovedFolder);
    // Folder renames are reported as moves; only files reach this list.
    changes(&mut records, diffs.renamed, DiffKind::RenamedFile, DiffKind::RenamedFile);
    changes(&mut records, diffs.copied, DiffKind::CopiedFile, DiffKind::CopiedFolder);
    items(&mut records, diffs.restored, DiffKind::RestoredFile, DiffKind::RestoredFolder);
    items(
        &mut records,
        diffs.bin_permanently_deleted,
        DiffKind::PermanentlyDeletedFile,
        DiffKind::PermanentlyDeletedFolder,
    );

    records
}

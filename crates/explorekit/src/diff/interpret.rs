//! Diff interpretation between two flattened snapshots.
//!
//! Phases run in a fixed order and every phase skips paths claimed by an
//! earlier one, so each item transition lands in exactly one category:
//!
//! 0. recycle bin restores are reserved up front
//! 1. renames (files, same parent)
//! 2. moves (same type and name, anywhere, across roots)
//! 3. copies (original still present)
//! 4. recycle bin restores and permanent deletes
//! 5. additions
//! 6. removals, soft when the target bin still holds the item
//!
//! "First match" always means first in flatten order.

use serde::Serialize;
use std::collections::HashSet;

use crate::flatten::FlatFact;
use crate::fs::{Node, NodeType, RecycleEntry};
use crate::path;

/// An item at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffItem {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub path: String,
}

impl DiffItem {
    fn from_fact(fact: &FlatFact) -> Self {
        Self {
            node_type: fact.node_type,
            name: fact.name.clone(),
            path: fact.path.clone(),
        }
    }
}

/// An item that changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathChange {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Name at the destination
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Raw diffs grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedDiffs {
    pub added: Vec<DiffItem>,
    /// Gone from the tree, still visible in the target bin
    pub removed: Vec<DiffItem>,
    /// Gone from the tree without passing through the bin
    pub removed_permanent: Vec<DiffItem>,
    pub moved_files: Vec<PathChange>,
    pub moved_folders: Vec<PathChange>,
    pub renamed: Vec<PathChange>,
    pub copied: Vec<PathChange>,
    pub restored: Vec<DiffItem>,
    /// Bin entries that disappeared without coming back to the tree
    pub bin_permanently_deleted: Vec<DiffItem>,
}

impl CategorizedDiffs {
    /// True when no category holds anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of raw diffs.
    pub fn len(&self) -> usize {
        self.added.len()
            + self.removed.len()
            + self.removed_permanent.len()
            + self.moved_files.len()
            + self.moved_folders.len()
            + self.renamed.len()
            + self.copied.len()
            + self.restored.len()
            + self.bin_permanently_deleted.len()
    }
}

type Key<'a> = (NodeType, &'a str);

/// Interpret the change between two snapshots.
///
/// Pure and infallible: malformed bin entries are skipped.
pub fn interpret(
    initial: &[FlatFact],
    target: &[FlatFact],
    initial_bin: &[RecycleEntry],
    target_bin: &[RecycleEntry],
) -> CategorizedDiffs {
    let initial_keys: HashSet<Key> = initial.iter().map(key).collect();
    let target_keys: HashSet<Key> = target.iter().map(key).collect();
    let initial_names: HashSet<Key> = initial
        .iter()
        .map(|f| (f.node_type, f.name.as_str()))
        .collect();

    let initial_bin_items = bin_items(initial_bin);
    let target_bin_items = bin_items(target_bin);
    let target_bin_keys: HashSet<Key> = target_bin_items
        .iter()
        .map(|i| (i.node_type, i.path.as_str()))
        .collect();

    let mut claimed_from: HashSet<&str> = HashSet::new();
    let mut claimed_to: HashSet<&str> = HashSet::new();
    let mut diffs = CategorizedDiffs::default();

    // Phase 0: a bin entry now live again is a restore; keep its path away
    // from rename, move and copy.
    let restored: Vec<&DiffItem> = initial_bin_items
        .iter()
        .filter(|item| {
            let k = (item.node_type, item.path.as_str());
            target_keys.contains(&k) && !target_bin_keys.contains(&k)
        })
        .collect();
    for item in &restored {
        claimed_to.insert(item.path.as_str());
    }
    // A restored folder brings its children back with it.
    let restored_children = restored_descendants(initial_bin, &restored);
    for t in target {
        if restored_children.contains(&(t.node_type, t.path.clone())) {
            claimed_to.insert(t.path.as_str());
        }
    }

    // Phase 1: renames.
    for source in initial.iter().filter(|f| f.node_type.is_file()) {
        if target_keys.contains(&key(source)) || claimed_from.contains(source.path.as_str()) {
            continue;
        }
        let Some(parent) = path::parent(&source.path) else {
            continue;
        };
        let candidate = target.iter().find(|t| {
            t.node_type.is_file()
                && t.path != source.path
                && path::parent(&t.path) == Some(parent)
                && !initial_keys.contains(&key(t))
                && !claimed_to.contains(t.path.as_str())
        });
        if let Some(t) = candidate {
            claimed_from.insert(source.path.as_str());
            claimed_to.insert(t.path.as_str());
            diffs.renamed.push(change(source, t));
        }
    }

    // Phase 2: moves.
    for source in initial {
        if target_keys.contains(&key(source)) || claimed_from.contains(source.path.as_str()) {
            continue;
        }
        let candidate = target.iter().find(|t| {
            t.node_type == source.node_type
                && t.name == source.name
                && !initial_keys.contains(&key(t))
                && !claimed_to.contains(t.path.as_str())
        });
        if let Some(t) = candidate {
            claimed_from.insert(source.path.as_str());
            claimed_to.insert(t.path.as_str());
            let record = change(source, t);
            match source.node_type {
                NodeType::File => diffs.moved_files.push(record),
                NodeType::Folder => diffs.moved_folders.push(record),
            }
        }
    }

    // Phase 3: copies. The source must have survived at its own path.
    for t in target {
        if initial_keys.contains(&key(t)) || claimed_to.contains(t.path.as_str()) {
            continue;
        }
        let source = initial.iter().find(|s| {
            s.node_type == t.node_type && s.name == t.name && target_keys.contains(&key(s))
        });
        if let Some(s) = source {
            claimed_to.insert(t.path.as_str());
            diffs.copied.push(change(s, t));
        }
    }

    // Phase 4: recycle bin.
    diffs.restored = restored.into_iter().cloned().collect();
    let mut bin_deleted: HashSet<Key> = HashSet::new();
    for item in &initial_bin_items {
        let k = (item.node_type, item.path.as_str());
        if !target_keys.contains(&k) && !target_bin_keys.contains(&k) {
            bin_deleted.insert(k);
            diffs.bin_permanently_deleted.push(item.clone());
        }
    }

    // Phase 5: additions.
    for t in target {
        if initial_names.contains(&(t.node_type, t.name.as_str()))
            || claimed_to.contains(t.path.as_str())
        {
            continue;
        }
        diffs.added.push(DiffItem::from_fact(t));
    }

    // Phase 6: removals.
    let target_bin_folders: Vec<&str> = target_bin_items
        .iter()
        .filter(|i| i.node_type.is_folder())
        .map(|i| i.path.as_str())
        .collect();
    for source in initial {
        if target_keys.contains(&key(source)) || claimed_from.contains(source.path.as_str()) {
            continue;
        }
        let in_bin = target_bin_keys.contains(&key(source))
            || target_bin_folders
                .iter()
                .any(|folder| path::is_descendant(&source.path, folder));
        if in_bin {
            diffs.removed.push(DiffItem::from_fact(source));
        } else if !bin_deleted.contains(&key(source)) {
            diffs.removed_permanent.push(DiffItem::from_fact(source));
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        added = diffs.added.len(),
        removed = diffs.removed.len(),
        removed_permanent = diffs.removed_permanent.len(),
        moved = diffs.moved_files.len() + diffs.moved_folders.len(),
        renamed = diffs.renamed.len(),
        copied = diffs.copied.len(),
        restored = diffs.restored.len(),
        bin_permanently_deleted = diffs.bin_permanently_deleted.len(),
        "interpreted snapshot diff"
    );

    diffs
}

fn key(fact: &FlatFact) -> Key<'_> {
    (fact.node_type, fact.path.as_str())
}

fn change(from: &FlatFact, to: &FlatFact) -> PathChange {
    PathChange {
        node_type: from.node_type,
        name: to.name.clone(),
        from: from.path.clone(),
        to: to.path.clone(),
    }
}

/// Paths of everything below the restored bin folders, as they were deleted.
fn restored_descendants(
    bin: &[RecycleEntry],
    restored: &[&DiffItem],
) -> HashSet<(NodeType, String)> {
    let mut paths = HashSet::new();
    for entry in bin.iter().filter(|e| e.node_type().is_folder()) {
        let Some(full_path) = entry.full_path() else {
            continue;
        };
        if restored
            .iter()
            .any(|r| r.node_type == NodeType::Folder && r.path == full_path)
        {
            collect_subtree(&entry.item, &full_path, &mut paths);
        }
    }
    paths
}

fn collect_subtree(node: &Node, base: &str, paths: &mut HashSet<(NodeType, String)>) {
    for child in &node.children {
        let child_path = path::join(base, &child.name);
        collect_subtree(child, &child_path, paths);
        paths.insert((child.node_type, child_path));
    }
}

/// Well-formed bin entries as items at their original full path, first seen
/// wins on duplicates.
fn bin_items(bin: &[RecycleEntry]) -> Vec<DiffItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for entry in bin {
        let Some(full_path) = entry.full_path() else {
            #[cfg(feature = "logging")]
            tracing::debug!(id = %entry.item.id, "skipping malformed recycle bin entry");
            continue;
        };
        if seen.insert((entry.node_type(), full_path.clone())) {
            items.push(DiffItem {
                node_type: entry.node_type(),
                name: entry.name().to_string(),
                path: full_path,
            });
        }
    }
    items
}

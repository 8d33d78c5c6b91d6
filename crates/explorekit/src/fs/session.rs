//! Mutable session state: the live tree, its recycle bin and an action log.
//!
//! The GUI layer owns a [`Session`] and drives it through explicit methods.
//! Nothing in the diff or evaluation core reads a session directly; callers
//! hand over a [`Snapshot`] or a `&dyn LiveState`.

use serde::{Deserialize, Serialize};

use super::node::{new_id, unique_child_name, Node, NodeType, SystemRoot};
use super::recycle::RecycleEntry;
use super::snapshot::Snapshot;
use super::traits::LiveState;
use crate::error::{Error, Result};
use crate::path;

/// Session behavior knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Folders that cannot be moved, renamed or deleted
    pub protected_folders: Vec<String>,
    /// Folder created under the default root when a restore target is gone
    pub restore_folder: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protected_folders: vec![
                "C:\\Desktop".to_string(),
                "C:\\Documents".to_string(),
                "C:\\Downloads".to_string(),
                "OneDrive".to_string(),
            ],
            restore_folder: "Restored".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a protected folder path.
    pub fn protect(mut self, folder: impl Into<String>) -> Self {
        self.protected_folders.push(path::normalize(&folder.into()));
        self
    }

    /// Drop every protected folder.
    pub fn without_protection(mut self) -> Self {
        self.protected_folders.clear();
        self
    }

    /// Set the fallback restore folder name.
    pub fn restore_folder(mut self, name: impl Into<String>) -> Self {
        self.restore_folder = name.into();
        self
    }
}

/// A mutation recorded in the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    Create {
        subject_id: String,
        to_path: String,
        node_type: NodeType,
    },
    #[serde(rename_all = "camelCase")]
    Rename {
        subject_id: String,
        from_name: String,
        to_name: String,
        parent_path: String,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        subject_id: String,
        from_path: String,
        to_path: String,
    },
    #[serde(rename_all = "camelCase")]
    Copy {
        subject_id: String,
        output_id: String,
        from_path: String,
        to_path: String,
    },
    #[serde(rename_all = "camelCase")]
    Delete {
        subject_id: String,
        from_path: String,
    },
    #[serde(rename_all = "camelCase")]
    Restore {
        subject_id: String,
        to_path: String,
    },
    #[serde(rename_all = "camelCase")]
    PermanentDelete { subject_id: String, name: String },
}

/// One entry in the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub ts: i64,
    pub action: Action,
}

/// Live file-system session.
#[derive(Debug, Clone)]
pub struct Session {
    system: SystemRoot,
    recycle_bin: Vec<RecycleEntry>,
    config: SessionConfig,
    action_log: Vec<ActionEvent>,
}

impl Session {
    /// Session over a tree with an empty bin and default config.
    pub fn new(system: SystemRoot) -> Self {
        Self {
            system,
            recycle_bin: Vec::new(),
            config: SessionConfig::default(),
            action_log: Vec::new(),
        }
    }

    /// Session starting from a deep copy of a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut session = Self::new(snapshot.structure.clone());
        session.recycle_bin = snapshot.recycle_bin.clone();
        session
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Deep copy of the current tree and bin.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.system.clone(), self.recycle_bin.clone())
    }

    /// Copy of the action log.
    pub fn action_log(&self) -> Vec<ActionEvent> {
        self.action_log.clone()
    }

    pub fn reset_action_log(&mut self) {
        self.action_log.clear();
    }

    /// Roots and configured folders are protected.
    pub fn is_protected(&self, target: &str) -> bool {
        path::is_root(target)
            || self
                .config
                .protected_folders
                .iter()
                .any(|p| path::same_path(p, target))
    }

    /// Create an empty folder. Duplicate names are rejected.
    pub fn create_folder(&mut self, parent: &str, name: &str) -> Result<String> {
        self.create(parent, Node::folder(validate_name(name)?, vec![]))
    }

    /// Create a text file. Duplicate names are rejected.
    pub fn create_file(&mut self, parent: &str, name: &str, content: &str) -> Result<String> {
        self.create(parent, Node::text_file(validate_name(name)?, content))
    }

    fn create(&mut self, parent: &str, node: Node) -> Result<String> {
        let folder = self
            .system
            .folder_at_mut(parent)
            .ok_or_else(|| Error::NotFound(parent.to_string()))?;
        if folder.child(&node.name).is_some() {
            return Err(Error::NameConflict(node.name));
        }
        let to_path = path::join(parent, &node.name);
        let subject_id = node.id.clone();
        let node_type = node.node_type;
        folder.children.push(node);

        self.record(Action::Create {
            subject_id,
            to_path: to_path.clone(),
            node_type,
        });
        Ok(to_path)
    }

    /// Rename in place. Returns the new path.
    pub fn rename(&mut self, target: &str, new_name: &str) -> Result<String> {
        self.ensure_unprotected(target)?;
        let new_name = validate_name(new_name)?;
        let parent = parent_folder(target)?;
        let old_name = path::name(target);
        if old_name == new_name {
            return Ok(target.to_string());
        }

        let folder = self
            .system
            .folder_at_mut(parent)
            .ok_or_else(|| Error::NotFound(target.to_string()))?;
        if folder.child(&new_name).is_some() {
            return Err(Error::NameConflict(new_name));
        }
        let node = folder
            .children
            .iter_mut()
            .find(|c| c.name == old_name)
            .ok_or_else(|| Error::NotFound(target.to_string()))?;
        node.name = new_name.clone();
        let subject_id = node.id.clone();

        self.record(Action::Rename {
            subject_id,
            from_name: old_name.to_string(),
            to_name: new_name.clone(),
            parent_path: parent.to_string(),
        });
        Ok(path::join(parent, &new_name))
    }

    /// Cut and paste into `dest`. Ids are preserved; the name is made unique.
    pub fn move_item(&mut self, target: &str, dest: &str) -> Result<String> {
        self.ensure_unprotected(target)?;
        let parent = parent_folder(target)?;
        if path::same_path(parent, dest) {
            return Ok(target.to_string());
        }
        if path::same_path(target, dest) || path::is_descendant(dest, target) {
            return Err(Error::InvalidDestination(dest.to_string()));
        }
        if self.system.folder_at(dest).is_none() {
            return Err(Error::NotFound(dest.to_string()));
        }

        let mut node = self.take_child(parent, path::name(target))?;
        let dest_folder = self
            .system
            .folder_at_mut(dest)
            .ok_or_else(|| Error::NotFound(dest.to_string()))?;
        node.name = unique_child_name(&dest_folder.children, &node.name);
        let to_path = path::join(dest, &node.name);
        let subject_id = node.id.clone();
        dest_folder.children.push(node);

        self.record(Action::Move {
            subject_id,
            from_path: target.to_string(),
            to_path: to_path.clone(),
        });
        Ok(to_path)
    }

    /// Copy into `dest`. The copy and its descendants get fresh ids.
    pub fn copy_item(&mut self, target: &str, dest: &str) -> Result<String> {
        if path::same_path(target, dest) || path::is_descendant(dest, target) {
            return Err(Error::InvalidDestination(dest.to_string()));
        }
        let source = self
            .system
            .node_at(target)
            .ok_or_else(|| Error::NotFound(target.to_string()))?;
        let subject_id = source.id.clone();
        let mut copy = source.clone_with_new_ids();

        let dest_folder = self
            .system
            .folder_at_mut(dest)
            .ok_or_else(|| Error::NotFound(dest.to_string()))?;
        copy.name = unique_child_name(&dest_folder.children, &copy.name);
        let to_path = path::join(dest, &copy.name);
        let output_id = copy.id.clone();
        dest_folder.children.push(copy);

        self.record(Action::Copy {
            subject_id,
            output_id,
            from_path: target.to_string(),
            to_path: to_path.clone(),
        });
        Ok(to_path)
    }

    /// Soft delete: move the item into the recycle bin with its ids intact.
    pub fn delete(&mut self, target: &str) -> Result<()> {
        self.ensure_unprotected(target)?;
        let parent = parent_folder(target)?;
        let node = self.take_child(parent, path::name(target))?;
        let subject_id = node.id.clone();
        self.recycle_bin.push(RecycleEntry::new(node, parent));

        self.record(Action::Delete {
            subject_id,
            from_path: target.to_string(),
        });
        Ok(())
    }

    /// Restore a bin entry by id. Returns the restored path.
    ///
    /// Goes back to the original folder when it still exists, otherwise into
    /// the fallback restore folder under the default root.
    pub fn restore(&mut self, id: &str) -> Result<String> {
        let idx = self.bin_position(id)?;
        let original = self.recycle_bin[idx].original_path.clone();
        let dest = if self.system.folder_at(&original).is_some() {
            original
        } else {
            self.ensure_restore_folder()?
        };

        let mut item = self.recycle_bin.remove(idx).item;
        let dest_folder = self
            .system
            .folder_at_mut(&dest)
            .ok_or_else(|| Error::NotFound(dest.clone()))?;
        item.name = unique_child_name(&dest_folder.children, &item.name);
        let to_path = path::join(&dest, &item.name);
        let subject_id = item.id.clone();
        dest_folder.children.push(item);

        self.record(Action::Restore {
            subject_id,
            to_path: to_path.clone(),
        });
        Ok(to_path)
    }

    /// Remove a bin entry for good.
    pub fn delete_permanently(&mut self, id: &str) -> Result<()> {
        let idx = self.bin_position(id)?;
        let entry = self.recycle_bin.remove(idx);
        self.record(Action::PermanentDelete {
            subject_id: entry.item.id,
            name: entry.item.name,
        });
        Ok(())
    }

    /// Permanently delete everything in the bin. Returns the count removed.
    pub fn empty_recycle_bin(&mut self) -> usize {
        let entries: Vec<RecycleEntry> = self.recycle_bin.drain(..).collect();
        let count = entries.len();
        for entry in entries {
            self.record(Action::PermanentDelete {
                subject_id: entry.item.id,
                name: entry.item.name,
            });
        }
        count
    }

    fn ensure_unprotected(&self, target: &str) -> Result<()> {
        if self.is_protected(target) {
            return Err(Error::Protected(target.to_string()));
        }
        Ok(())
    }

    fn bin_position(&self, id: &str) -> Result<usize> {
        self.recycle_bin
            .iter()
            .position(|e| e.item.id == id)
            .ok_or_else(|| Error::NotFound(format!("{}\\{}", path::RECYCLE_BIN, id)))
    }

    fn take_child(&mut self, parent: &str, name: &str) -> Result<Node> {
        let folder = self
            .system
            .folder_at_mut(parent)
            .ok_or_else(|| Error::NotFound(parent.to_string()))?;
        let idx = folder
            .children
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::NotFound(path::join(parent, name)))?;
        Ok(folder.children.remove(idx))
    }

    fn ensure_restore_folder(&mut self) -> Result<String> {
        let root_name = self
            .system
            .default_root()
            .map(|r| r.name.clone())
            .ok_or_else(|| Error::NotFound(path::THIS_PC.to_string()))?;
        let folder_path = path::join(&root_name, &self.config.restore_folder);
        if self.system.folder_at(&folder_path).is_none() {
            let name = self.config.restore_folder.clone();
            let root = self
                .system
                .folder_at_mut(&root_name)
                .ok_or_else(|| Error::NotFound(root_name.clone()))?;
            if root.child(&name).is_some() {
                return Err(Error::NameConflict(name));
            }
            root.children.push(Node::folder(name, vec![]));
        }
        Ok(folder_path)
    }

    fn record(&mut self, action: Action) {
        #[cfg(feature = "logging")]
        tracing::debug!(?action, "session mutation");
        self.action_log.push(ActionEvent {
            id: new_id(),
            ts: chrono::Utc::now().timestamp_millis(),
            action,
        });
    }
}

impl LiveState for Session {
    fn system(&self) -> &SystemRoot {
        &self.system
    }

    fn recycle_bin(&self) -> &[RecycleEntry] {
        &self.recycle_bin
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(path::SEPARATOR) || trimmed.contains('/') {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

fn parent_folder(target: &str) -> Result<&str> {
    match path::parent(target) {
        Some(parent) if !path::is_special_location(parent) => Ok(parent),
        _ => Err(Error::InvalidDestination(target.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(SystemRoot::new(vec![
            Node::folder(
                "C:",
                vec![
                    Node::folder("Documents", vec![]),
                    Node::folder("Work", vec![Node::file("report.txt").with_id("r")]),
                ],
            ),
            Node::folder("OneDrive", vec![]),
        ]))
    }

    #[test]
    fn create_rejects_duplicates() {
        let mut s = session();
        s.create_folder("C:", "Photos").unwrap();
        assert!(matches!(s.create_folder("C:", "Photos"), Err(Error::NameConflict(_))));
        assert!(matches!(s.create_file("C:", "  ", ""), Err(Error::InvalidName(_))));
        assert!(matches!(s.create_file("C:\\Nope", "a.txt", ""), Err(Error::NotFound(_))));
    }

    #[test]
    fn rename_keeps_id() {
        let mut s = session();
        let to = s.rename("C:\\Work\\report.txt", "final.txt").unwrap();
        assert_eq!(to, "C:\\Work\\final.txt");
        assert_eq!(s.system().path_of_id("r").as_deref(), Some("C:\\Work\\final.txt"));
    }

    #[test]
    fn protected_folders_cannot_move() {
        let mut s = session();
        assert!(matches!(s.delete("C:\\Documents"), Err(Error::Protected(_))));
        assert!(matches!(s.rename("C:\\Documents", "Docs"), Err(Error::Protected(_))));
        assert!(matches!(s.move_item("C:\\Documents", "OneDrive"), Err(Error::Protected(_))));
        assert!(matches!(s.delete("C:"), Err(Error::Protected(_))));
    }

    #[test]
    fn move_into_own_subtree_is_rejected() {
        let mut s = session();
        s.create_folder("C:\\Work", "Sub").unwrap();
        assert!(matches!(
            s.move_item("C:\\Work", "C:\\Work\\Sub"),
            Err(Error::InvalidDestination(_))
        ));
    }

    #[test]
    fn move_resolves_name_conflicts() {
        let mut s = session();
        s.create_file("OneDrive", "report.txt", "").unwrap();
        let to = s.move_item("C:\\Work\\report.txt", "OneDrive").unwrap();
        assert_eq!(to, "OneDrive\\report (1).txt");
        assert_eq!(s.system().path_of_id("r").as_deref(), Some("OneDrive\\report (1).txt"));
    }

    #[test]
    fn delete_and_restore_round_trip() {
        let mut s = session();
        s.delete("C:\\Work\\report.txt").unwrap();
        assert!(!s.file_exists("C:\\Work\\report.txt"));
        assert_eq!(s.recycle_bin()[0].original_path, "C:\\Work");
        assert!(s.recycle_bin()[0].deleted_at.is_some());

        let to = s.restore("r").unwrap();
        assert_eq!(to, "C:\\Work\\report.txt");
        assert!(s.recycle_bin().is_empty());
    }

    #[test]
    fn restore_falls_back_when_origin_is_gone() {
        let mut s = session();
        s.delete("C:\\Work\\report.txt").unwrap();
        s.delete("C:\\Work").unwrap();
        let work_id = s.recycle_bin()[1].item.id.clone();
        s.delete_permanently(&work_id).unwrap();

        let to = s.restore("r").unwrap();
        assert_eq!(to, "C:\\Restored\\report.txt");
    }

    #[test]
    fn action_log_records_mutations() {
        let mut s = session();
        s.copy_item("C:\\Work\\report.txt", "OneDrive").unwrap();
        s.delete("C:\\Work\\report.txt").unwrap();
        assert_eq!(s.empty_recycle_bin(), 1);

        let log = s.action_log();
        assert_eq!(log.len(), 3);
        assert!(matches!(log[0].action, Action::Copy { .. }));
        assert!(matches!(log[1].action, Action::Delete { .. }));
        assert!(matches!(log[2].action, Action::PermanentDelete { .. }));
    }
}

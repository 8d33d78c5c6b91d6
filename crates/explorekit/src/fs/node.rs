//! Tree model: nodes, roots and the multi-root system container.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::path;

/// Node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Regular file (possibly a zip archive)
    File,
    /// Folder with ordered children
    Folder,
}

impl NodeType {
    /// Wire name: `"file"` or `"folder"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Folder => "folder",
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeType::File)
    }

    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeType::Folder)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Archive listing attached to zip files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZipMeta {
    /// Flat entry names
    #[serde(default)]
    pub entries: Vec<String>,
}

/// A file or folder.
///
/// `id` is assigned once and survives moves, renames and restores. Copies get
/// fresh ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_zip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_contents: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_meta: Option<ZipMeta>,
    /// Display metadata for roots (drive kind, display name). Not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fresh opaque node id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Node {
    fn bare(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            node_type,
            children: Vec::new(),
            content: None,
            size: None,
            is_zip: false,
            compressed_contents: None,
            zip_meta: None,
            meta: None,
        }
    }

    /// New folder with a fresh id.
    pub fn folder(name: impl Into<String>, children: Vec<Node>) -> Self {
        let mut node = Self::bare(name, NodeType::Folder);
        node.children = children;
        node
    }

    /// New empty file with a fresh id.
    pub fn file(name: impl Into<String>) -> Self {
        Self::bare(name, NodeType::File)
    }

    /// New file with text content.
    pub fn text_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut node = Self::bare(name, NodeType::File);
        node.size = Some(content.len() as u64);
        node.content = Some(content);
        node
    }

    /// New zip archive listing the given entry names.
    pub fn zip(name: impl Into<String>, entries: Vec<String>) -> Self {
        let mut node = Self::bare(name, NodeType::File);
        node.is_zip = true;
        node.zip_meta = Some(ZipMeta { entries });
        node
    }

    /// Replace the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_folder(&self) -> bool {
        self.node_type.is_folder()
    }

    pub fn is_file(&self) -> bool {
        self.node_type.is_file()
    }

    /// Direct child by name (names are unique among siblings).
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Fill in missing ids in this subtree. Existing ids are kept.
    pub fn ensure_ids(&mut self) {
        if self.id.trim().is_empty() {
            self.id = new_id();
        }
        for child in &mut self.children {
            child.ensure_ids();
        }
    }

    /// Deep clone with every id in the subtree replaced.
    pub fn clone_with_new_ids(&self) -> Node {
        let mut cloned = self.clone();
        cloned.reassign_ids();
        cloned
    }

    fn reassign_ids(&mut self) {
        self.id = new_id();
        for child in &mut self.children {
            child.reassign_ids();
        }
    }

    fn find_by_id(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    fn path_of(&self, id: &str, current: &str) -> Option<String> {
        if self.id == id {
            return Some(current.to_string());
        }
        self.children
            .iter()
            .find_map(|c| c.path_of(id, &path::join(current, &c.name)))
    }
}

/// Pick a sibling name that does not collide: `name (1).ext`, `name (2).ext`, ...
///
/// Used only by system operations (paste, restore). User create and rename
/// reject duplicates instead.
pub fn unique_child_name(children: &[Node], desired: &str) -> String {
    let taken = |candidate: &str| children.iter().any(|c| c.name == candidate);
    if !taken(desired) {
        return desired.to_string();
    }

    let (base, ext) = match desired.rsplit_once('.') {
        Some((base, ext)) => (base, format!(".{}", ext)),
        None => (desired, String::new()),
    };

    let mut counter = 1;
    loop {
        let candidate = format!("{} ({}){}", base, counter, ext);
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Accepted shapes for a stored structure.
///
/// The multi-root shape `{roots: [...]}` and the legacy single-root shape
/// `{name, type: "folder", children}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Structure {
    System { roots: Vec<Node> },
    Single(Node),
}

/// Top-level container of named roots (`C:`, `OneDrive`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Structure")]
pub struct SystemRoot {
    pub roots: Vec<Node>,
}

impl From<Structure> for SystemRoot {
    fn from(structure: Structure) -> Self {
        let roots = match structure {
            Structure::System { roots } => roots,
            Structure::Single(node) if node.is_folder() && !node.name.is_empty() => vec![node],
            Structure::Single(_) => vec![Node::folder("C:", vec![])],
        };
        let mut system = SystemRoot { roots };
        system.ensure_ids();
        system
    }
}

impl SystemRoot {
    /// Build from roots, filling in missing ids.
    pub fn new(roots: Vec<Node>) -> Self {
        Structure::System { roots }.into()
    }

    /// Fill in missing ids everywhere.
    pub fn ensure_ids(&mut self) {
        for root in &mut self.roots {
            root.ensure_ids();
        }
    }

    /// Reject duplicate root names.
    pub fn check_roots(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for root in &self.roots {
            if !seen.insert(root.name.as_str()) {
                return Err(Error::DuplicateRoot(root.name.clone()));
            }
        }
        Ok(())
    }

    /// Root by name.
    pub fn root(&self, name: &str) -> Option<&Node> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// Preferred default root: `C:` when present, else the first root.
    pub fn default_root(&self) -> Option<&Node> {
        self.root("C:").or_else(|| self.roots.first())
    }

    /// Item at a path. Intermediate segments must be folders.
    pub fn node_at(&self, target: &str) -> Option<&Node> {
        let root = self.root(path::root_of(target)?)?;
        let mut segments = path::segments_below_root(target).peekable();
        let mut current = root;
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                current = current
                    .children
                    .iter()
                    .find(|c| c.name == segment && c.is_folder())?;
            } else {
                current = current.child(segment)?;
            }
        }
        Some(current)
    }

    /// Folder at a path (roots count as folders).
    pub fn folder_at(&self, target: &str) -> Option<&Node> {
        self.node_at(target).filter(|n| n.is_folder())
    }

    /// File at a path.
    pub fn file_at(&self, target: &str) -> Option<&Node> {
        self.node_at(target).filter(|n| n.is_file())
    }

    /// Mutable folder at a path.
    pub fn folder_at_mut(&mut self, target: &str) -> Option<&mut Node> {
        let root_name = path::root_of(target)?;
        let mut current = self.roots.iter_mut().find(|r| r.name == root_name)?;
        for segment in path::segments_below_root(target) {
            current = current
                .children
                .iter_mut()
                .find(|c| c.name == segment && c.is_folder())?;
        }
        Some(current)
    }

    /// Node by id, searching every root.
    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        if id.is_empty() {
            return None;
        }
        self.roots.iter().find_map(|r| r.find_by_id(id))
    }

    /// Absolute path of a node id, or `None` if absent.
    pub fn path_of_id(&self, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }
        self.roots.iter().find_map(|r| r.path_of(id, &r.name))
    }
}

//! Declarative checks.
//!
//! A check states what must be true of the final state, never how the
//! student got there. Wire shape is `{"type": "...", ...fields}`.
//!
//! Parsing is lenient: a check whose `type` is unknown (or whose fields do
//! not have the expected shape) is kept as [`Check::Unrecognized`] and
//! evaluates to `false`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fs::NodeType;

/// A check as stored in a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Check {
    Known(CheckSpec),
    Unrecognized(UnrecognizedCheck),
}

/// Check payload that did not match any known check type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedCheck {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UnrecognizedCheck {
    /// The raw `type` field, if it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }
}

/// Known check types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CheckSpec {
    FolderExists(PathCheck),
    FolderNotExists(PathCheck),
    FileExists(PathCheck),
    FileNotExists(PathCheck),
    FileMoved(MoveCheck),
    FolderMoved(MoveCheck),
    FileRenamed(MoveCheck),
    FolderRenamed(MoveCheck),
    FileCopied(MoveCheck),
    FolderCopied(MoveCheck),
    FileRestored(PathCheck),
    FolderRestored(PathCheck),
    FilePermanentlyDeleted(PathCheck),
    FolderPermanentlyDeleted(PathCheck),
    ZipExists(PathCheck),
    ZipContains(ZipContainsCheck),
    ZipExtractedTo(ZipExtractCheck),
}

/// Fields: `path`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathCheck {
    pub path: Option<String>,
}

/// Fields: `from`, `to`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveCheck {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Fields: `zipPath`, `entries`, `mode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipContainsCheck {
    pub zip_path: Option<String>,
    pub entries: Option<Vec<String>>,
    #[serde(default)]
    pub mode: ZipMode,
}

/// Fields: `zipPath`, `destinationFolder`, `expectEntries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipExtractCheck {
    pub zip_path: Option<String>,
    pub destination_folder: Option<String>,
    pub expect_entries: Option<Vec<ExpectedEntry>>,
}

/// Archive matching mode for `zip-contains`. Anything but `"any"` means all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ZipMode {
    #[default]
    All,
    Any,
}

impl ZipMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZipMode::All => "all",
            ZipMode::Any => "any",
        }
    }
}

impl From<String> for ZipMode {
    fn from(value: String) -> Self {
        if value == "any" {
            ZipMode::Any
        } else {
            ZipMode::All
        }
    }
}

impl From<ZipMode> for &'static str {
    fn from(mode: ZipMode) -> Self {
        mode.as_str()
    }
}

/// An entry expected after extraction: bare name (file or folder) or typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedEntry {
    Name(String),
    Typed {
        name: String,
        #[serde(rename = "type")]
        node_type: NodeType,
    },
}

impl Check {
    pub fn folder_exists(path: impl Into<String>) -> Self {
        Check::Known(CheckSpec::FolderExists(PathCheck::at(path)))
    }

    pub fn folder_not_exists(path: impl Into<String>) -> Self {
        Check::Known(CheckSpec::FolderNotExists(PathCheck::at(path)))
    }

    pub fn file_exists(path: impl Into<String>) -> Self {
        Check::Known(CheckSpec::FileExists(PathCheck::at(path)))
    }

    pub fn file_not_exists(path: impl Into<String>) -> Self {
        Check::Known(CheckSpec::FileNotExists(PathCheck::at(path)))
    }

    pub fn zip_exists(path: impl Into<String>) -> Self {
        Check::Known(CheckSpec::ZipExists(PathCheck::at(path)))
    }

    pub fn zip_contains(zip_path: impl Into<String>, entries: Vec<String>, mode: ZipMode) -> Self {
        Check::Known(CheckSpec::ZipContains(ZipContainsCheck {
            zip_path: Some(zip_path.into()),
            entries: Some(entries),
            mode,
        }))
    }

    pub fn zip_extracted_to(
        zip_path: impl Into<String>,
        destination_folder: impl Into<String>,
        expect_entries: Vec<ExpectedEntry>,
    ) -> Self {
        Check::Known(CheckSpec::ZipExtractedTo(ZipExtractCheck {
            zip_path: Some(zip_path.into()),
            destination_folder: Some(destination_folder.into()),
            expect_entries: Some(expect_entries),
        }))
    }

    /// Wire `type`, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Check::Known(spec) => Some(spec.type_name()),
            Check::Unrecognized(raw) => raw.kind(),
        }
    }

    pub fn spec(&self) -> Option<&CheckSpec> {
        match self {
            Check::Known(spec) => Some(spec),
            Check::Unrecognized(_) => None,
        }
    }
}

impl From<CheckSpec> for Check {
    fn from(spec: CheckSpec) -> Self {
        Check::Known(spec)
    }
}

impl PathCheck {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl MoveCheck {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }
}

impl CheckSpec {
    pub fn type_name(&self) -> &'static str {
        match self {
            CheckSpec::FolderExists(_) => "folder-exists",
            CheckSpec::FolderNotExists(_) => "folder-not-exists",
            CheckSpec::FileExists(_) => "file-exists",
            CheckSpec::FileNotExists(_) => "file-not-exists",
            CheckSpec::FileMoved(_) => "file-moved",
            CheckSpec::FolderMoved(_) => "folder-moved",
            CheckSpec::FileRenamed(_) => "file-renamed",
            CheckSpec::FolderRenamed(_) => "folder-renamed",
            CheckSpec::FileCopied(_) => "file-copied",
            CheckSpec::FolderCopied(_) => "folder-copied",
            CheckSpec::FileRestored(_) => "file-restored",
            CheckSpec::FolderRestored(_) => "folder-restored",
            CheckSpec::FilePermanentlyDeleted(_) => "file-permanently-deleted",
            CheckSpec::FolderPermanentlyDeleted(_) => "folder-permanently-deleted",
            CheckSpec::ZipExists(_) => "zip-exists",
            CheckSpec::ZipContains(_) => "zip-contains",
            CheckSpec::ZipExtractedTo(_) => "zip-extracted-to",
        }
    }

    /// Required fields that are missing, null or empty strings.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let mut need = |name: &'static str, present: bool| {
            if !present {
                missing.push(name);
            }
        };
        match self {
            CheckSpec::FolderExists(c)
            | CheckSpec::FolderNotExists(c)
            | CheckSpec::FileExists(c)
            | CheckSpec::FileNotExists(c)
            | CheckSpec::FileRestored(c)
            | CheckSpec::FolderRestored(c)
            | CheckSpec::FilePermanentlyDeleted(c)
            | CheckSpec::FolderPermanentlyDeleted(c)
            | CheckSpec::ZipExists(c) => need("path", has_text(&c.path)),
            CheckSpec::FileMoved(c)
            | CheckSpec::FolderMoved(c)
            | CheckSpec::FileRenamed(c)
            | CheckSpec::FolderRenamed(c)
            | CheckSpec::FileCopied(c)
            | CheckSpec::FolderCopied(c) => {
                need("from", has_text(&c.from));
                need("to", has_text(&c.to));
            }
            CheckSpec::ZipContains(c) => {
                need("zipPath", has_text(&c.zip_path));
                need("entries", c.entries.is_some());
            }
            CheckSpec::ZipExtractedTo(c) => {
                need("zipPath", has_text(&c.zip_path));
                need("destinationFolder", has_text(&c.destination_folder));
                need("expectEntries", c.expect_entries.is_some());
            }
        }
        missing
    }

    /// Single `path` field of path-shaped checks.
    pub fn path(&self) -> Option<&str> {
        match self {
            CheckSpec::FolderExists(c)
            | CheckSpec::FolderNotExists(c)
            | CheckSpec::FileExists(c)
            | CheckSpec::FileNotExists(c)
            | CheckSpec::FileRestored(c)
            | CheckSpec::FolderRestored(c)
            | CheckSpec::FilePermanentlyDeleted(c)
            | CheckSpec::FolderPermanentlyDeleted(c)
            | CheckSpec::ZipExists(c) => c.path.as_deref(),
            _ => None,
        }
    }

    /// `(from, to)` of move-shaped checks.
    pub fn from_to(&self) -> Option<(Option<&str>, Option<&str>)> {
        match self {
            CheckSpec::FileMoved(c)
            | CheckSpec::FolderMoved(c)
            | CheckSpec::FileRenamed(c)
            | CheckSpec::FolderRenamed(c)
            | CheckSpec::FileCopied(c)
            | CheckSpec::FolderCopied(c) => Some((c.from.as_deref(), c.to.as_deref())),
            _ => None,
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

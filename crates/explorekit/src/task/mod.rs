//! Tasks and checks
//!
//! Two task shapes exist on the wire:
//!
//! - [`LegacyTask`]: produced by the diff synthesizer and the manual zip
//!   builders, keyed by its check contents (`file-moved`, `zip-compress`, ...)
//! - [`DslTask`]: the canonical export shape with an explicit subject
//!   (`move`, `rename`, `zip-create`, ...)
//!
//! [`Task`] is the tagged union of both, plus a raw fallback for payloads that
//! match neither. Legacy tasks convert to DSL tasks with
//! [`LegacyTask::to_dsl`]; DSL tasks are validated with [`validate`].

mod check;
mod describe;
mod dsl;
mod legacy;
mod synthesize;

pub use check::{
    Check, CheckSpec, ExpectedEntry, MoveCheck, PathCheck, UnrecognizedCheck, ZipContainsCheck,
    ZipExtractCheck, ZipMode,
};
pub use describe::{describe, fallback_description};
pub use dsl::{validate, validate_tasks, Validation};
pub use legacy::{legacy_subject_id, to_dsl_tasks, ConversionError};
pub use synthesize::{generate_tasks, synthesize, zip_compress_task, zip_extract_task};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Legacy task types, named after the change they check for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyTaskType {
    FolderCreated,
    FileCreated,
    FolderDeleted,
    FileDeleted,
    FileMoved,
    FolderMoved,
    FileRenamed,
    FileCopied,
    FolderCopied,
    FileRestored,
    FolderRestored,
    FilePermanentlyDeleted,
    FolderPermanentlyDeleted,
    ZipCompress,
    ZipExtract,
}

impl LegacyTaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyTaskType::FolderCreated => "folder-created",
            LegacyTaskType::FileCreated => "file-created",
            LegacyTaskType::FolderDeleted => "folder-deleted",
            LegacyTaskType::FileDeleted => "file-deleted",
            LegacyTaskType::FileMoved => "file-moved",
            LegacyTaskType::FolderMoved => "folder-moved",
            LegacyTaskType::FileRenamed => "file-renamed",
            LegacyTaskType::FileCopied => "file-copied",
            LegacyTaskType::FolderCopied => "folder-copied",
            LegacyTaskType::FileRestored => "file-restored",
            LegacyTaskType::FolderRestored => "folder-restored",
            LegacyTaskType::FilePermanentlyDeleted => "file-permanently-deleted",
            LegacyTaskType::FolderPermanentlyDeleted => "folder-permanently-deleted",
            LegacyTaskType::ZipCompress => "zip-compress",
            LegacyTaskType::ZipExtract => "zip-extract",
        }
    }
}

impl std::fmt::Display for LegacyTaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Pre-DSL task: a type, a description and its checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTask {
    #[serde(rename = "type")]
    pub task_type: LegacyTaskType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checks: Vec<Check>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl LegacyTask {
    /// Task with a generated default description.
    pub fn new(task_type: LegacyTaskType, checks: Vec<Check>) -> Self {
        let mut task = Self {
            task_type,
            description: String::new(),
            checks,
            enabled: true,
        };
        task.description = describe(&task);
        task
    }
}

/// DSL task types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Move,
    Rename,
    Delete,
    PermanentlyDelete,
    Create,
    Restore,
    Copy,
    ZipCreate,
    ZipExtract,
}

impl TaskType {
    pub const ALL: [TaskType; 9] = [
        TaskType::Move,
        TaskType::Rename,
        TaskType::Delete,
        TaskType::PermanentlyDelete,
        TaskType::Create,
        TaskType::Restore,
        TaskType::Copy,
        TaskType::ZipCreate,
        TaskType::ZipExtract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Move => "move",
            TaskType::Rename => "rename",
            TaskType::Delete => "delete",
            TaskType::PermanentlyDelete => "permanently-delete",
            TaskType::Create => "create",
            TaskType::Restore => "restore",
            TaskType::Copy => "copy",
            TaskType::ZipCreate => "zip-create",
            TaskType::ZipExtract => "zip-extract",
        }
    }

    /// Look up a DSL type by wire name.
    pub fn parse(name: &str) -> Option<TaskType> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Fields that must be present and non-blank.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            TaskType::Move | TaskType::Copy => &["subjectId", "fromPath", "toPath"],
            TaskType::Rename => &["subjectId", "fromName", "toName"],
            TaskType::Delete | TaskType::PermanentlyDelete => &["subjectId", "fromPath"],
            TaskType::Create | TaskType::Restore => &["subjectId", "toPath"],
            TaskType::ZipCreate => &["inputIds", "outputName", "outputPath"],
            TaskType::ZipExtract => &["archiveId", "destPath"],
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DSL type plus its subject fields.
///
/// Fields are optional at parse time so an incomplete task still loads and
/// [`validate`] can report every missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TaskAction {
    #[serde(rename_all = "camelCase")]
    Move {
        subject_id: Option<String>,
        from_path: Option<String>,
        to_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Rename {
        subject_id: Option<String>,
        from_name: Option<String>,
        to_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Delete {
        subject_id: Option<String>,
        from_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    PermanentlyDelete {
        subject_id: Option<String>,
        from_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Create {
        subject_id: Option<String>,
        to_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Restore {
        subject_id: Option<String>,
        to_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Copy {
        subject_id: Option<String>,
        from_path: Option<String>,
        to_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ZipCreate {
        input_ids: Option<Vec<String>>,
        output_name: Option<String>,
        output_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ZipExtract {
        archive_id: Option<String>,
        dest_path: Option<String>,
    },
}

impl TaskAction {
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskAction::Move { .. } => TaskType::Move,
            TaskAction::Rename { .. } => TaskType::Rename,
            TaskAction::Delete { .. } => TaskType::Delete,
            TaskAction::PermanentlyDelete { .. } => TaskType::PermanentlyDelete,
            TaskAction::Create { .. } => TaskType::Create,
            TaskAction::Restore { .. } => TaskType::Restore,
            TaskAction::Copy { .. } => TaskType::Copy,
            TaskAction::ZipCreate { .. } => TaskType::ZipCreate,
            TaskAction::ZipExtract { .. } => TaskType::ZipExtract,
        }
    }
}

/// Canonical exported task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DslTask {
    #[serde(flatten)]
    pub action: TaskAction,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checks: Vec<Check>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl DslTask {
    /// Non-strict task with no checks and a fallback description.
    pub fn new(action: TaskAction) -> Self {
        let mut task = Self {
            action,
            strict: false,
            description: String::new(),
            checks: Vec::new(),
            enabled: true,
        };
        task.description = fallback_description(&task.action);
        task
    }

    pub fn with_checks(mut self, checks: Vec<Check>) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn task_type(&self) -> TaskType {
        self.action.task_type()
    }
}

/// Any task found in a configuration or produced by the authoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Task {
    Dsl(DslTask),
    Legacy(LegacyTask),
    /// Payload matching neither shape, kept verbatim
    Other(Value),
}

impl Task {
    /// Wire `type`, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Task::Dsl(task) => Some(task.task_type().as_str()),
            Task::Legacy(task) => Some(task.task_type.as_str()),
            Task::Other(value) => value.get("type").and_then(Value::as_str),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Task::Dsl(task) => &task.description,
            Task::Legacy(task) => &task.description,
            Task::Other(value) => value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Task::Dsl(task) => task.enabled,
            Task::Legacy(task) => task.enabled,
            Task::Other(value) => value
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        }
    }

    /// The task's checks. Raw tasks are parsed on demand; unreadable check
    /// lists count as empty.
    pub fn checks(&self) -> Cow<'_, [Check]> {
        match self {
            Task::Dsl(task) => Cow::Borrowed(&task.checks),
            Task::Legacy(task) => Cow::Borrowed(&task.checks),
            Task::Other(value) => Cow::Owned(
                value
                    .get("checks")
                    .and_then(|checks| serde_json::from_value(checks.clone()).ok())
                    .unwrap_or_default(),
            ),
        }
    }
}

impl From<DslTask> for Task {
    fn from(task: DslTask) -> Self {
        Task::Dsl(task)
    }
}

impl From<LegacyTask> for Task {
    fn from(task: LegacyTask) -> Self {
        Task::Legacy(task)
    }
}

//! Exercise configuration: load, validate and export.
//!
//! Wire shape (camelCase):
//!
//! ```json
//! {
//!   "meta": {"title": "...", "description": "..."},
//!   "initialStructure": {"roots": [...]},
//!   "initialRecycleBin": [...],
//!   "tasks": [...]
//! }
//! ```
//!
//! `initialStructure` may also be a legacy single root
//! (`{"name": "C:", "type": "folder", "children": [...]}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::{RecycleEntry, Snapshot, SystemRoot};
use crate::task::{to_dsl_tasks, validate, validate_tasks, Task, Validation};

/// Title used when an exercise is exported without one.
pub const DEFAULT_TITLE: &str = "Untitled exercise";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// An exercise: start state plus the tasks to complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    #[serde(default)]
    pub meta: ExerciseMeta,
    #[serde(default)]
    pub initial_structure: SystemRoot,
    #[serde(default, deserialize_with = "crate::fs::deserialize_bin")]
    pub initial_recycle_bin: Vec<RecycleEntry>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ExerciseConfig {
    /// Draft exercise starting from `initial`.
    pub fn new(meta: ExerciseMeta, initial: Snapshot, tasks: Vec<Task>) -> Self {
        Self {
            meta,
            initial_structure: initial.structure,
            initial_recycle_bin: initial.recycle_bin,
            tasks,
        }
    }

    /// Parse a configuration.
    ///
    /// Invalid tasks are logged, not rejected: a student session can still
    /// start. A non-array `tasks` value loads as an empty task list.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(json)?;

        let validation = validate_tasks(value.get("tasks").unwrap_or(&Value::Null));
        if !validation.valid {
            #[cfg(feature = "logging")]
            tracing::warn!(errors = ?validation.errors, "exercise tasks failed validation");
        }

        if let Some(fields) = value.as_object_mut() {
            if fields.get("tasks").is_some_and(|t| !t.is_array()) {
                fields.insert("tasks".to_string(), Value::Array(Vec::new()));
            }
        }

        let config: ExerciseConfig = serde_json::from_value(value)?;
        config.initial_structure.check_roots()?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validate the current tasks against the DSL.
    pub fn validation(&self) -> Validation {
        match serde_json::to_value(&self.tasks) {
            Ok(value) => validate_tasks(&value),
            Err(e) => Validation {
                valid: false,
                errors: vec![format!("tasks could not be serialized: {e}")],
            },
        }
    }

    /// The start state as a snapshot.
    pub fn initial_snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.initial_structure.clone(),
            self.initial_recycle_bin.clone(),
        )
    }

    /// Build the exported form of this draft.
    ///
    /// Keeps enabled tasks with a non-blank description, converts legacy
    /// tasks to DSL tasks and validates them. Any conversion or validation
    /// error blocks the export.
    pub fn export(&self) -> Result<Self> {
        let selected: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.enabled() && !t.description().trim().is_empty())
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(Error::NoTasks);
        }

        let (dsl_tasks, conversion_errors) = to_dsl_tasks(&selected);
        if !conversion_errors.is_empty() {
            return Err(Error::Conversion(conversion_errors));
        }

        let validation = validate(&dsl_tasks);
        if !validation.valid {
            return Err(Error::Validation(validation.errors));
        }

        let title = if self.meta.title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.meta.title.clone()
        };

        #[cfg(feature = "logging")]
        tracing::debug!(tasks = dsl_tasks.len(), %title, "exercise exported");

        Ok(Self {
            meta: ExerciseMeta {
                title,
                description: self.meta.description.clone(),
            },
            initial_structure: self.initial_structure.clone(),
            initial_recycle_bin: self.initial_recycle_bin.clone(),
            tasks: dsl_tasks.into_iter().map(Task::Dsl).collect(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::Node;
    use crate::task::{synthesize, zip_compress_task, LegacyTask, LegacyTaskType, TaskAction};
    use crate::diff::{DiffKind, DiffRecord};
    use serde_json::json;

    fn draft(tasks: Vec<Task>) -> ExerciseConfig {
        let initial = Snapshot::new(SystemRoot::new(vec![Node::folder("C:", vec![])]), vec![]);
        ExerciseConfig::new(ExerciseMeta::default(), initial, tasks)
    }

    #[test]
    fn loads_legacy_structure_and_tolerates_bad_tasks() {
        let json = json!({
            "meta": {"title": "Sort files"},
            "initialStructure": {"name": "C:", "type": "folder", "children": [{"name": "a.txt", "type": "file"}]},
            "tasks": [{"type": "move", "subjectId": "n1"}]
        })
        .to_string();
        let config = ExerciseConfig::from_json_str(&json).unwrap();
        assert_eq!(config.initial_structure.roots.len(), 1);
        assert!(config.initial_recycle_bin.is_empty());
        assert!(!config.validation().valid);
    }

    #[test]
    fn malformed_bin_entries_are_skipped_on_load() {
        let json = json!({
            "initialStructure": {"roots": [{"name": "C:", "type": "folder"}]},
            "initialRecycleBin": [
                {"name": "old.txt", "originalPath": "C:\\Docs"},
                null,
                {"name": "keep.txt", "type": "file", "originalPath": "C:"}
            ],
            "tasks": []
        })
        .to_string();
        let config = ExerciseConfig::from_json_str(&json).unwrap();
        assert_eq!(config.initial_recycle_bin.len(), 1);
        assert_eq!(config.initial_recycle_bin[0].name(), "keep.txt");
    }

    #[test]
    fn non_array_tasks_load_as_empty() {
        let json = r#"{"initialStructure": {"roots": []}, "tasks": {"oops": true}}"#;
        let config = ExerciseConfig::from_json_str(json).unwrap();
        assert!(config.tasks.is_empty());
    }

    #[test]
    fn duplicate_roots_are_rejected() {
        let json = r#"{"initialStructure": {"roots": [{"name": "C:", "type": "folder"}, {"name": "C:", "type": "folder"}]}}"#;
        assert!(matches!(ExerciseConfig::from_json_str(json), Err(Error::DuplicateRoot(_))));
    }

    #[test]
    fn export_converts_and_filters() {
        let mut disabled = synthesize(&DiffRecord::at(DiffKind::AddedFolder, "C:\\Old", "Old")).unwrap();
        disabled.enabled = false;
        let mut blank = synthesize(&DiffRecord::at(DiffKind::AddedFolder, "C:\\Blank", "Blank")).unwrap();
        blank.description = "  ".to_string();

        let config = draft(vec![
            synthesize(&DiffRecord::at(DiffKind::AddedFile, "C:\\Notes.txt", "Notes.txt"))
                .unwrap()
                .into(),
            disabled.into(),
            blank.into(),
            zip_compress_task("C:\\pack.zip", vec!["Notes.txt".into()]).into(),
        ]);

        let exported = config.export().unwrap();
        assert_eq!(exported.meta.title, DEFAULT_TITLE);
        assert_eq!(exported.tasks.len(), 2);
        assert_eq!(exported.tasks[0].type_name(), Some("create"));
        assert_eq!(exported.tasks[1].type_name(), Some("zip-create"));
        assert!(exported.validation().valid);

        let reparsed = ExerciseConfig::from_json_str(&exported.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed, exported);
    }

    #[test]
    fn export_requires_tasks() {
        assert!(matches!(draft(vec![]).export(), Err(Error::NoTasks)));
    }

    #[test]
    fn conversion_errors_block_export() {
        let broken = LegacyTask {
            task_type: LegacyTaskType::FileMoved,
            description: "Move it".to_string(),
            checks: vec![],
            enabled: true,
        };
        let err = draft(vec![broken.into()]).export().unwrap_err();
        assert_eq!(
            err.to_string(),
            "task conversion failed: tasks[0]: Missing move check data for \"file-moved\""
        );
    }

    #[test]
    fn validation_errors_block_export() {
        let task = crate::task::DslTask::new(TaskAction::Copy {
            subject_id: Some("n1".into()),
            from_path: Some("C:\\a.txt".into()),
            to_path: None,
        });
        let err = draft(vec![task.into()]).export().unwrap_err();
        assert!(matches!(err, Error::Validation(errors) if errors == vec!["tasks[0].toPath is required for type \"copy\""]));
    }
}

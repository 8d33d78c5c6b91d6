//! Legacy task to DSL conversion.

use thiserror::Error;

use super::check::{Check, CheckSpec, ZipExtractCheck};
use super::{DslTask, LegacyTask, LegacyTaskType, Task, TaskAction, TaskType};
use crate::path;

/// Why a legacy task could not be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The checks do not carry the fields the DSL subject needs.
    #[error("Missing {what} for \"{task_type}\"")]
    MissingData {
        what: &'static str,
        task_type: LegacyTaskType,
    },

    /// No DSL counterpart for this task type.
    #[error("Task type \"{0}\" is unsupported")]
    Unsupported(String),

    /// A DSL-typed task whose fields do not match the task schema.
    #[error("Task \"{0}\" does not match the task schema")]
    Malformed(String),
}

/// Deterministic subject id for tasks that have no stable node id.
///
/// `legacy:{kind}:{normalized path}`.
pub fn legacy_subject_id(kind: &str, target: &str) -> String {
    let raw = if target.is_empty() { "unknown" } else { target };
    format!("legacy:{}:{}", kind, path::normalize(raw))
}

impl LegacyTask {
    /// Convert to the DSL shape. Checks and description carry over; the
    /// result is never strict.
    pub fn to_dsl(&self) -> Result<DslTask, ConversionError> {
        let kind = self.task_type.as_str();
        let missing = |what| ConversionError::MissingData {
            what,
            task_type: self.task_type,
        };

        let action = match self.task_type {
            LegacyTaskType::FileMoved | LegacyTaskType::FolderMoved => {
                let (from, to) = self
                    .move_pair(&["file-moved", "folder-moved"])
                    .ok_or_else(|| missing("move check data"))?;
                TaskAction::Move {
                    subject_id: Some(legacy_subject_id(kind, from)),
                    from_path: Some(from.to_string()),
                    to_path: Some(to.to_string()),
                }
            }
            LegacyTaskType::FileRenamed => {
                let (from, to) = self
                    .move_pair(&["file-renamed"])
                    .ok_or_else(|| missing("rename check data"))?;
                TaskAction::Rename {
                    subject_id: Some(legacy_subject_id(kind, from)),
                    from_name: Some(path::name(from).to_string()),
                    to_name: Some(path::name(to).to_string()),
                }
            }
            LegacyTaskType::FileDeleted | LegacyTaskType::FolderDeleted => {
                let from = self
                    .path_or_first(&["file-not-exists", "folder-not-exists"])
                    .ok_or_else(|| missing("delete path"))?;
                TaskAction::Delete {
                    subject_id: Some(legacy_subject_id(kind, from)),
                    from_path: Some(from.to_string()),
                }
            }
            LegacyTaskType::FilePermanentlyDeleted | LegacyTaskType::FolderPermanentlyDeleted => {
                let from = self
                    .path_or_first(&["file-permanently-deleted", "folder-permanently-deleted"])
                    .ok_or_else(|| missing("permanent delete path"))?;
                TaskAction::PermanentlyDelete {
                    subject_id: Some(legacy_subject_id(kind, from)),
                    from_path: Some(from.to_string()),
                }
            }
            LegacyTaskType::FileCreated | LegacyTaskType::FolderCreated => {
                let to = self
                    .path_or_first(&["file-exists", "folder-exists"])
                    .ok_or_else(|| missing("create path"))?;
                TaskAction::Create {
                    subject_id: Some(legacy_subject_id(kind, to)),
                    to_path: Some(to.to_string()),
                }
            }
            LegacyTaskType::FileRestored | LegacyTaskType::FolderRestored => {
                let to = self
                    .path_of(&["file-restored", "folder-restored"])
                    .ok_or_else(|| missing("restore path"))?;
                TaskAction::Restore {
                    subject_id: Some(legacy_subject_id(kind, to)),
                    to_path: Some(to.to_string()),
                }
            }
            LegacyTaskType::FileCopied | LegacyTaskType::FolderCopied => {
                let (from, to) = self
                    .move_pair(&["file-copied", "folder-copied"])
                    .ok_or_else(|| missing("copy check data"))?;
                TaskAction::Copy {
                    subject_id: Some(legacy_subject_id(kind, from)),
                    from_path: Some(from.to_string()),
                    to_path: Some(to.to_string()),
                }
            }
            LegacyTaskType::ZipCompress => {
                let output = self
                    .path_of(&["zip-exists"])
                    .ok_or_else(|| missing("zip output path"))?;
                let input_ids: Vec<String> = self
                    .first_spec(&["zip-contains"])
                    .and_then(|spec| match spec {
                        CheckSpec::ZipContains(c) => c.entries.as_ref(),
                        _ => None,
                    })
                    .map(|entries| {
                        entries
                            .iter()
                            .map(|entry| legacy_subject_id("entry", entry))
                            .collect()
                    })
                    .unwrap_or_default();
                TaskAction::ZipCreate {
                    input_ids: Some(input_ids),
                    output_name: Some(path::name(output).to_string()),
                    output_path: Some(output.to_string()),
                }
            }
            LegacyTaskType::ZipExtract => {
                let (zip_path, dest) = zip_extract_fields(&self.checks)
                    .ok_or_else(|| missing("zip extract data"))?;
                TaskAction::ZipExtract {
                    archive_id: Some(legacy_subject_id("archive", zip_path)),
                    dest_path: Some(dest.to_string()),
                }
            }
        };

        Ok(DslTask {
            action,
            strict: false,
            description: self.description.clone(),
            checks: self.checks.clone(),
            enabled: self.enabled,
        })
    }

    fn first_spec(&self, types: &[&str]) -> Option<&CheckSpec> {
        types.iter().find_map(|t| {
            self.checks
                .iter()
                .filter_map(Check::spec)
                .find(|spec| spec.type_name() == *t)
        })
    }

    fn path_of(&self, types: &[&str]) -> Option<&str> {
        self.first_spec(types)
            .and_then(CheckSpec::path)
            .filter(|p| !p.is_empty())
    }

    /// Path of the first matching check, else of the first check.
    fn path_or_first(&self, types: &[&str]) -> Option<&str> {
        let spec = self
            .first_spec(types)
            .or_else(|| self.checks.first().and_then(Check::spec));
        spec.and_then(CheckSpec::path).filter(|p| !p.is_empty())
    }

    fn move_pair(&self, types: &[&str]) -> Option<(&str, &str)> {
        match self.first_spec(types).and_then(CheckSpec::from_to) {
            Some((Some(from), Some(to))) if !from.is_empty() && !to.is_empty() => Some((from, to)),
            _ => None,
        }
    }
}

fn zip_extract_fields(checks: &[Check]) -> Option<(&str, &str)> {
    let extract = checks.iter().find_map(|c| match c.spec() {
        Some(CheckSpec::ZipExtractedTo(extract)) => Some(extract),
        _ => None,
    })?;
    let ZipExtractCheck {
        zip_path,
        destination_folder,
        ..
    } = extract;
    match (zip_path.as_deref(), destination_folder.as_deref()) {
        (Some(zip), Some(dest)) if !zip.is_empty() && !dest.is_empty() => Some((zip, dest)),
        _ => None,
    }
}

/// Fill an incomplete `zip-extract` task's subject from its extraction check.
///
/// `zip-extract` is both a legacy and a DSL type name, so a legacy payload
/// parses as a DSL task with empty subject fields.
fn hydrate_zip_extract(task: &mut DslTask) {
    let TaskAction::ZipExtract {
        archive_id,
        dest_path,
    } = &mut task.action
    else {
        return;
    };
    let Some((zip, dest)) = zip_extract_fields(&task.checks) else {
        return;
    };
    if archive_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        *archive_id = Some(legacy_subject_id("archive", zip));
    }
    if dest_path.as_deref().is_none_or(|p| p.trim().is_empty()) {
        *dest_path = Some(dest.to_string());
    }
}

/// Convert a task list to DSL tasks.
///
/// DSL tasks pass through. Failures are collected as `tasks[i]: reason`.
pub fn to_dsl_tasks(tasks: &[Task]) -> (Vec<DslTask>, Vec<String>) {
    let mut converted = Vec::with_capacity(tasks.len());
    let mut errors = Vec::new();

    for (index, task) in tasks.iter().enumerate() {
        let result = match task {
            Task::Dsl(dsl) => {
                let mut dsl = dsl.clone();
                hydrate_zip_extract(&mut dsl);
                Ok(dsl)
            }
            Task::Legacy(legacy) => legacy.to_dsl(),
            Task::Other(_) => {
                let type_name = task.type_name().unwrap_or("unknown").to_string();
                if TaskType::parse(&type_name).is_some() {
                    Err(ConversionError::Malformed(type_name))
                } else {
                    Err(ConversionError::Unsupported(type_name))
                }
            }
        };
        match result {
            Ok(dsl) => converted.push(dsl),
            Err(e) => errors.push(format!("tasks[{index}]: {e}")),
        }
    }

    (converted, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::check::{ExpectedEntry, MoveCheck, ZipMode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn legacy(task_type: LegacyTaskType, checks: Vec<Check>) -> LegacyTask {
        LegacyTask {
            task_type,
            description: "do it".to_string(),
            checks,
            enabled: true,
        }
    }

    #[test]
    fn move_gets_path_based_subject() {
        let task = legacy(
            LegacyTaskType::FileMoved,
            vec![CheckSpec::FileMoved(MoveCheck::new("C:/Report.txt", "OneDrive\\Report.txt")).into()],
        );
        let dsl = task.to_dsl().unwrap();
        assert_eq!(
            dsl.action,
            TaskAction::Move {
                subject_id: Some("legacy:file-moved:C:\\Report.txt".into()),
                from_path: Some("C:/Report.txt".into()),
                to_path: Some("OneDrive\\Report.txt".into()),
            }
        );
        assert!(!dsl.strict);
        assert_eq!(dsl.description, "do it");
        assert_eq!(dsl.checks, task.checks);
    }

    #[test]
    fn rename_uses_names() {
        let task = legacy(
            LegacyTaskType::FileRenamed,
            vec![CheckSpec::FileRenamed(MoveCheck::new("C:\\a.txt", "C:\\b.txt")).into()],
        );
        assert!(matches!(
            task.to_dsl().unwrap().action,
            TaskAction::Rename { from_name: Some(f), to_name: Some(t), .. } if f == "a.txt" && t == "b.txt"
        ));
    }

    #[test]
    fn delete_falls_back_to_first_check() {
        let task = legacy(LegacyTaskType::FolderDeleted, vec![Check::folder_exists("C:\\Old")]);
        assert!(matches!(
            task.to_dsl().unwrap().action,
            TaskAction::Delete { from_path: Some(p), .. } if p == "C:\\Old"
        ));
    }

    #[test]
    fn missing_data_is_reported() {
        let task = legacy(LegacyTaskType::FileCopied, vec![CheckSpec::FileCopied(MoveCheck::default()).into()]);
        assert_eq!(
            task.to_dsl().unwrap_err().to_string(),
            "Missing copy check data for \"file-copied\""
        );
    }

    #[test]
    fn zip_tasks_convert() {
        let compress = legacy(
            LegacyTaskType::ZipCompress,
            vec![
                Check::zip_exists("C:\\Out\\pack.zip"),
                Check::zip_contains("C:\\Out\\pack.zip", vec!["a.txt".into(), "b.txt".into()], ZipMode::All),
            ],
        );
        assert_eq!(
            compress.to_dsl().unwrap().action,
            TaskAction::ZipCreate {
                input_ids: Some(vec!["legacy:entry:a.txt".into(), "legacy:entry:b.txt".into()]),
                output_name: Some("pack.zip".into()),
                output_path: Some("C:\\Out\\pack.zip".into()),
            }
        );

        let extract = legacy(
            LegacyTaskType::ZipExtract,
            vec![Check::zip_extracted_to("C:\\pack.zip", "C:\\Out", vec![ExpectedEntry::Name("a.txt".into())])],
        );
        assert_eq!(
            extract.to_dsl().unwrap().action,
            TaskAction::ZipExtract {
                archive_id: Some("legacy:archive:C:\\pack.zip".into()),
                dest_path: Some("C:\\Out".into()),
            }
        );
    }

    #[test]
    fn batch_conversion_collects_errors() {
        let tasks: Vec<Task> = vec![
            legacy(LegacyTaskType::FileCreated, vec![Check::file_exists("C:\\n.txt")]).into(),
            legacy(LegacyTaskType::FileRestored, vec![]).into(),
            Task::Other(json!({"type": "teleport"})),
            Task::Other(json!({"type": "move", "strict": "yes"})),
        ];
        let (converted, errors) = to_dsl_tasks(&tasks);
        assert_eq!(converted.len(), 1);
        assert_eq!(
            errors,
            vec![
                "tasks[1]: Missing restore path for \"file-restored\"",
                "tasks[2]: Task type \"teleport\" is unsupported",
                "tasks[3]: Task \"move\" does not match the task schema",
            ]
        );
    }

    #[test]
    fn legacy_zip_extract_payload_is_hydrated() {
        let task: Task = serde_json::from_value(json!({
            "type": "zip-extract",
            "description": "Extract",
            "checks": [{"type": "zip-extracted-to", "zipPath": "C:\\a.zip", "destinationFolder": "C:\\Out", "expectEntries": []}]
        }))
        .unwrap();
        let (converted, errors) = to_dsl_tasks(&[task]);
        assert!(errors.is_empty());
        assert_eq!(
            converted[0].action,
            TaskAction::ZipExtract {
                archive_id: Some("legacy:archive:C:\\a.zip".into()),
                dest_path: Some("C:\\Out".into()),
            }
        );
    }
}

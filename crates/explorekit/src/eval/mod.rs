//! Check evaluation against a live state.
//!
//! Evaluation only reads through [`LiveState`]; it never mutates the tree,
//! the recycle bin or anything else. Every check evaluates to a `bool`:
//! misconfigured checks (missing required fields) and unknown check types
//! are `false` and logged at `warn`.

mod score;

pub use score::{score, CheckOutcome, ScoreReport, TaskOutcome};

use crate::fs::{bin_has_ancestor_folder, bin_has_item, LiveState, NodeType};
use crate::path;
use crate::task::{Check, CheckSpec, ExpectedEntry, Task, ZipMode};

/// Evaluate one check.
pub fn evaluate(check: &Check, state: &dyn LiveState) -> bool {
    let spec = match check {
        Check::Known(spec) => spec,
        Check::Unrecognized(_raw) => {
            #[cfg(feature = "logging")]
            tracing::warn!(check_type = ?_raw.kind(), "unknown check type");
            return false;
        }
    };

    let missing = spec.missing_fields();
    if !missing.is_empty() {
        #[cfg(feature = "logging")]
        tracing::warn!(
            check_type = spec.type_name(),
            missing = %missing.join(", "),
            "check misconfigured"
        );
        return false;
    }

    evaluate_spec(spec, state)
}

/// Fields are known to be present here.
fn evaluate_spec(spec: &CheckSpec, state: &dyn LiveState) -> bool {
    let bin = state.recycle_bin();
    match spec {
        CheckSpec::FolderExists(c) => state.folder_exists(text(&c.path)),
        CheckSpec::FolderNotExists(c) => !state.folder_exists(text(&c.path)),
        CheckSpec::FileExists(c) => state.file_exists(text(&c.path)),
        CheckSpec::FileNotExists(c) => !state.file_exists(text(&c.path)),

        CheckSpec::FileMoved(c) | CheckSpec::FileRenamed(c) => {
            state.file_exists(text(&c.to)) && !state.file_exists(text(&c.from))
        }
        CheckSpec::FolderMoved(c) | CheckSpec::FolderRenamed(c) => {
            state.folder_exists(text(&c.to)) && !state.folder_exists(text(&c.from))
        }
        CheckSpec::FileCopied(c) => {
            state.file_exists(text(&c.from)) && state.file_exists(text(&c.to))
        }
        CheckSpec::FolderCopied(c) => {
            state.folder_exists(text(&c.from)) && state.folder_exists(text(&c.to))
        }

        CheckSpec::FileRestored(c) => {
            let target = text(&c.path);
            state.file_exists(target) && !bin_has_item(bin, NodeType::File, target)
        }
        CheckSpec::FolderRestored(c) => {
            let target = text(&c.path);
            state.folder_exists(target) && !bin_has_item(bin, NodeType::Folder, target)
        }
        CheckSpec::FilePermanentlyDeleted(c) => {
            let target = text(&c.path);
            !state.file_exists(target)
                && !bin_has_item(bin, NodeType::File, target)
                && !bin_has_ancestor_folder(bin, target)
        }
        CheckSpec::FolderPermanentlyDeleted(c) => {
            let target = text(&c.path);
            !state.folder_exists(target) && !bin_has_item(bin, NodeType::Folder, target)
        }

        CheckSpec::ZipExists(c) => {
            let target = text(&c.path);
            target.ends_with(".zip") && state.file_at(target).is_some_and(|f| f.is_zip)
        }
        CheckSpec::ZipContains(c) => {
            let Some(zip) = state.file_at(text(&c.zip_path)) else {
                return false;
            };
            if !zip.name.ends_with(".zip") {
                return false;
            }
            let Some(meta) = &zip.zip_meta else {
                #[cfg(feature = "logging")]
                tracing::warn!(zip_path = text(&c.zip_path), "zip-contains check: zip metadata missing");
                return false;
            };
            let wanted = c.entries.as_deref().unwrap_or_default();
            let listed = |entry: &String| meta.entries.contains(entry);
            match c.mode {
                ZipMode::Any => wanted.iter().any(listed),
                ZipMode::All => wanted.iter().all(listed),
            }
        }
        CheckSpec::ZipExtractedTo(c) => {
            let dest = text(&c.destination_folder);
            if !state.file_exists(text(&c.zip_path)) || !state.folder_exists(dest) {
                return false;
            }
            c.expect_entries
                .as_deref()
                .unwrap_or_default()
                .iter()
                .all(|entry| match entry {
                    ExpectedEntry::Name(name) => {
                        if name.is_empty() {
                            return false;
                        }
                        let entry_path = path::join(dest, name);
                        state.file_exists(&entry_path) || state.folder_exists(&entry_path)
                    }
                    ExpectedEntry::Typed { name, node_type } => {
                        if name.is_empty() {
                            return false;
                        }
                        let entry_path = path::join(dest, name);
                        match node_type {
                            NodeType::File => state.file_exists(&entry_path),
                            NodeType::Folder => state.folder_exists(&entry_path),
                        }
                    }
                })
        }
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Evaluate every check of one task.
///
/// A task is completed iff it has at least one check and all of them pass.
pub fn evaluate_task(task: &Task, state: &dyn LiveState) -> TaskOutcome {
    let checks: Vec<CheckOutcome> = task
        .checks()
        .iter()
        .map(|check| CheckOutcome {
            check: check.clone(),
            passed: evaluate(check, state),
        })
        .collect();
    let completed = !checks.is_empty() && checks.iter().all(|c| c.passed);

    TaskOutcome {
        task_type: task.type_name().map(str::to_string),
        description: task.description().to_string(),
        completed,
        checks,
    }
}

/// Evaluate tasks independently and score them.
pub fn evaluate_tasks(tasks: &[Task], state: &dyn LiveState) -> ScoreReport {
    let outcomes: Vec<TaskOutcome> = tasks.iter().map(|t| evaluate_task(t, state)).collect();
    ScoreReport::new(outcomes)
}

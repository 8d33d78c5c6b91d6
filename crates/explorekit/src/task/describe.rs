//! Default task descriptions.

use super::check::CheckSpec;
use super::{LegacyTask, LegacyTaskType, TaskAction};
use crate::path;

/// Templated description derived from a legacy task's checks.
///
/// Names the affected item; moves and copies also name the destination
/// folder. Empty when the task has no checks.
pub fn describe(task: &LegacyTask) -> String {
    if task.checks.is_empty() {
        return String::new();
    }
    let find = |type_name: &str| {
        task.checks
            .iter()
            .filter_map(|c| c.spec())
            .find(|spec| spec.type_name() == type_name)
    };
    let path_name = |type_name: &str| {
        find(type_name)
            .and_then(CheckSpec::path)
            .map(path::name)
            .unwrap_or("item")
            .to_string()
    };
    let to_of = |type_name: &str| {
        find(type_name)
            .and_then(CheckSpec::from_to)
            .and_then(|(_, to)| to)
            .filter(|to| !to.is_empty())
    };

    match task.task_type {
        LegacyTaskType::FolderCreated => format!(
            "Create a new folder \"{}\" in the right place.",
            path_name("folder-exists")
        ),
        LegacyTaskType::FileCreated => format!(
            "Create a new file \"{}\" in the right place.",
            path_name("file-exists")
        ),
        LegacyTaskType::FileDeleted => {
            format!("Delete the file \"{}\".", path_name("file-not-exists"))
        }
        LegacyTaskType::FolderDeleted => {
            format!("Delete the folder \"{}\".", path_name("folder-not-exists"))
        }
        LegacyTaskType::FileMoved => match to_of("file-moved") {
            Some(to) => format!("Move the file \"{}\" to \"{}\".", path::name(to), parent_name(to)),
            None => "Move the file to the right place.".to_string(),
        },
        LegacyTaskType::FolderMoved => match to_of("folder-moved") {
            Some(to) => format!("Move the folder \"{}\" to \"{}\".", path::name(to), parent_name(to)),
            None => "Move the folder to the right place.".to_string(),
        },
        LegacyTaskType::FileRenamed => {
            let from_to = find("file-renamed").and_then(CheckSpec::from_to);
            match from_to {
                Some((Some(from), Some(to))) => format!(
                    "Rename the file \"{}\" to \"{}\".",
                    path::name(from),
                    path::name(to)
                ),
                Some((None, Some(to))) => format!("Rename the file to \"{}\".", path::name(to)),
                _ => "Rename the file.".to_string(),
            }
        }
        LegacyTaskType::FileCopied => match to_of("file-copied") {
            Some(to) => format!("Copy the file \"{}\" to \"{}\".", path::name(to), parent_name(to)),
            None => "Copy the file to the right place.".to_string(),
        },
        LegacyTaskType::FolderCopied => match to_of("folder-copied") {
            Some(to) => format!("Copy the folder \"{}\" to \"{}\".", path::name(to), parent_name(to)),
            None => "Copy the folder to the right place.".to_string(),
        },
        LegacyTaskType::FileRestored => format!(
            "Restore the file \"{}\" from the Recycle Bin.",
            path_name("file-restored")
        ),
        LegacyTaskType::FolderRestored => format!(
            "Restore the folder \"{}\" from the Recycle Bin.",
            path_name("folder-restored")
        ),
        LegacyTaskType::FilePermanentlyDeleted => format!(
            "Permanently delete the file \"{}\".",
            path_name("file-permanently-deleted")
        ),
        LegacyTaskType::FolderPermanentlyDeleted => format!(
            "Permanently delete the folder \"{}\".",
            path_name("folder-permanently-deleted")
        ),
        LegacyTaskType::ZipCompress => {
            let zip = find("zip-exists")
                .and_then(CheckSpec::path)
                .filter(|p| !p.is_empty())
                .map(path::name)
                .unwrap_or("archive");
            format!("Create a ZIP archive \"{}\".", zip)
        }
        LegacyTaskType::ZipExtract => {
            let extract = find("zip-extracted-to").and_then(|spec| match spec {
                CheckSpec::ZipExtractedTo(c) => Some(c),
                _ => None,
            });
            let name_or = |value: Option<&String>, default: &'static str| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| path::name(v))
                    .unwrap_or(default)
                    .to_string()
            };
            format!(
                "Extract \"{}\" to \"{}\".",
                name_or(extract.and_then(|c| c.zip_path.as_ref()), "archive"),
                name_or(
                    extract.and_then(|c| c.destination_folder.as_ref()),
                    "destination folder"
                )
            )
        }
    }
}

/// Short description for a hand-built DSL task.
pub fn fallback_description(action: &TaskAction) -> String {
    let item = |p: &Option<String>| {
        p.as_deref()
            .filter(|p| !p.is_empty())
            .map(path::name)
            .unwrap_or("item")
            .to_string()
    };
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    match action {
        TaskAction::Move {
            from_path, to_path, ..
        } => format!("Move \"{}\" to \"{}\".", item(from_path), text(to_path)),
        TaskAction::Copy {
            from_path, to_path, ..
        } => format!("Copy \"{}\" to \"{}\".", item(from_path), text(to_path)),
        TaskAction::Rename {
            from_name, to_name, ..
        } => format!(
            "Rename \"{}\" to \"{}\".",
            from_name.as_deref().unwrap_or("item"),
            text(to_name)
        ),
        TaskAction::Delete { from_path, .. } => format!("Delete \"{}\".", item(from_path)),
        TaskAction::PermanentlyDelete { from_path, .. } => {
            format!("Permanently delete \"{}\".", item(from_path))
        }
        TaskAction::Create { to_path, .. } => format!("Create \"{}\".", item(to_path)),
        TaskAction::Restore { to_path, .. } => format!("Restore \"{}\".", item(to_path)),
        TaskAction::ZipCreate { output_name, .. } => {
            format!("Create archive \"{}\".", text(output_name))
        }
        TaskAction::ZipExtract { dest_path, .. } => {
            format!("Extract \"archive\" to \"{}\".", text(dest_path))
        }
    }
}

fn parent_name(to: &str) -> &str {
    match path::parent(to) {
        Some(parent) if parent != path::THIS_PC => path::name(parent),
        _ => path::THIS_PC,
    }
}

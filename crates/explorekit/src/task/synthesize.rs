//! Task synthesis from diff records, plus the manual zip task builders.

use super::check::{Check, CheckSpec, ExpectedEntry, MoveCheck, PathCheck, ZipMode};
use super::{LegacyTask, LegacyTaskType};
use crate::diff::{DiffKind, DiffRecord};

/// Map one diff record to a task with a single check.
///
/// Returns `None` when the record's target shape does not fit its kind
/// (a path where `from`/`to` is expected, or the reverse).
pub fn synthesize(record: &DiffRecord) -> Option<LegacyTask> {
    let at = || record.path().map(PathCheck::at);
    let change = || record.from_to().map(|(from, to)| MoveCheck::new(from, to));

    let (task_type, spec) = match record.kind {
        DiffKind::AddedFolder => (LegacyTaskType::FolderCreated, CheckSpec::FolderExists(at()?)),
        DiffKind::AddedFile => (LegacyTaskType::FileCreated, CheckSpec::FileExists(at()?)),
        DiffKind::RemovedFolder => (LegacyTaskType::FolderDeleted, CheckSpec::FolderNotExists(at()?)),
        DiffKind::RemovedFile => (LegacyTaskType::FileDeleted, CheckSpec::FileNotExists(at()?)),
        DiffKind::MovedFile => (LegacyTaskType::FileMoved, CheckSpec::FileMoved(change()?)),
        DiffKind::MovedFolder => (LegacyTaskType::FolderMoved, CheckSpec::FolderMoved(change()?)),
        DiffKind::RenamedFile => (LegacyTaskType::FileRenamed, CheckSpec::FileRenamed(change()?)),
        DiffKind::CopiedFile => (LegacyTaskType::FileCopied, CheckSpec::FileCopied(change()?)),
        DiffKind::CopiedFolder => (LegacyTaskType::FolderCopied, CheckSpec::FolderCopied(change()?)),
        DiffKind::RestoredFile => (LegacyTaskType::FileRestored, CheckSpec::FileRestored(at()?)),
        DiffKind::RestoredFolder => {
            (LegacyTaskType::FolderRestored, CheckSpec::FolderRestored(at()?))
        }
        DiffKind::PermanentlyDeletedFile => (
            LegacyTaskType::FilePermanentlyDeleted,
            CheckSpec::FilePermanentlyDeleted(at()?),
        ),
        DiffKind::PermanentlyDeletedFolder => (
            LegacyTaskType::FolderPermanentlyDeleted,
            CheckSpec::FolderPermanentlyDeleted(at()?),
        ),
    };

    Some(LegacyTask::new(task_type, vec![spec.into()]))
}

/// Synthesize a task for every record, in record order.
pub fn generate_tasks(records: &[DiffRecord]) -> Vec<LegacyTask> {
    records.iter().filter_map(synthesize).collect()
}

/// Manual `zip-compress` task: the archive must exist and list every entry.
pub fn zip_compress_task(zip_path: &str, entries: Vec<String>) -> LegacyTask {
    LegacyTask::new(
        LegacyTaskType::ZipCompress,
        vec![
            Check::zip_exists(zip_path),
            Check::zip_contains(zip_path, entries, ZipMode::All),
        ],
    )
}

/// Manual `zip-extract` task: every expected entry must appear under
/// `destination_folder`.
pub fn zip_extract_task(
    zip_path: &str,
    destination_folder: &str,
    expect_entries: Vec<ExpectedEntry>,
) -> LegacyTask {
    LegacyTask::new(
        LegacyTaskType::ZipExtract,
        vec![Check::zip_extracted_to(
            zip_path,
            destination_folder,
            expect_entries,
        )],
    )
}

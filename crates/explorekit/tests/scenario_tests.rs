//! End-to-end scenarios: diff two snapshots, synthesize tasks, evaluate.

use explorekit::diff::{diff_snapshots, DiffKind, DiffRecord};
use explorekit::eval::{evaluate, evaluate_tasks};
use explorekit::fs::{Node, RecycleEntry, Snapshot, SystemRoot};
use explorekit::task::{generate_tasks, Check, LegacyTaskType, Task};
use pretty_assertions::assert_eq;

fn snapshot(roots: Vec<Node>, bin: Vec<RecycleEntry>) -> Snapshot {
    Snapshot::new(SystemRoot::new(roots), bin)
}

fn c(children: Vec<Node>) -> Node {
    Node::folder("C:", children)
}

fn tasks_for(records: &[DiffRecord]) -> Vec<Task> {
    generate_tasks(records).into_iter().map(Task::from).collect()
}

#[test]
fn create_file() {
    let before = snapshot(vec![c(vec![])], vec![]);
    let after = snapshot(vec![c(vec![Node::file("Notes.txt")])], vec![]);

    let records = diff_snapshots(&before, &after).unwrap();
    assert_eq!(
        records,
        vec![DiffRecord::at(DiffKind::AddedFile, "C:\\Notes.txt", "Notes.txt")]
    );

    let tasks = generate_tasks(&records);
    assert_eq!(tasks[0].task_type, LegacyTaskType::FileCreated);
    assert_eq!(tasks[0].checks, vec![Check::file_exists("C:\\Notes.txt")]);
    assert!(evaluate(&tasks[0].checks[0], &after));
    assert!(!evaluate(&tasks[0].checks[0], &before));
}

#[test]
fn rename_file() {
    let before = snapshot(vec![c(vec![Node::folder("Docs", vec![Node::file("a.txt")])])], vec![]);
    let after = snapshot(vec![c(vec![Node::folder("Docs", vec![Node::file("b.txt")])])], vec![]);

    let records = diff_snapshots(&before, &after).unwrap();
    assert_eq!(
        records,
        vec![DiffRecord::change(
            DiffKind::RenamedFile,
            "C:\\Docs\\a.txt",
            "C:\\Docs\\b.txt",
            "b.txt"
        )]
    );

    let tasks = tasks_for(&records);
    assert_eq!(evaluate_tasks(&tasks, &after).score, 100);

    let both = snapshot(
        vec![c(vec![Node::folder("Docs", vec![Node::file("a.txt"), Node::file("b.txt")])])],
        vec![],
    );
    assert_eq!(evaluate_tasks(&tasks, &both).score, 0);
}

#[test]
fn move_across_roots() {
    let before = snapshot(
        vec![c(vec![Node::file("Report.txt")]), Node::folder("OneDrive", vec![])],
        vec![],
    );
    let after = snapshot(
        vec![c(vec![]), Node::folder("OneDrive", vec![Node::file("Report.txt")])],
        vec![],
    );

    let records = diff_snapshots(&before, &after).unwrap();
    assert_eq!(
        records,
        vec![DiffRecord::change(
            DiffKind::MovedFile,
            "C:\\Report.txt",
            "OneDrive\\Report.txt",
            "Report.txt"
        )]
    );
    assert!(records.iter().all(|r| r.kind != DiffKind::RemovedFile));
}

#[test]
fn permanent_delete_from_bin() {
    let tree = || vec![c(vec![Node::folder("Docs", vec![])])];
    let before = snapshot(tree(), vec![RecycleEntry::new(Node::file("old.txt"), "C:\\Docs")]);
    let after = snapshot(tree(), vec![]);

    let records = diff_snapshots(&before, &after).unwrap();
    assert_eq!(
        records,
        vec![DiffRecord::at(
            DiffKind::PermanentlyDeletedFile,
            "C:\\Docs\\old.txt",
            "old.txt"
        )]
    );

    let tasks = tasks_for(&records);
    assert_eq!(evaluate_tasks(&tasks, &after).score, 100);
    assert_eq!(evaluate_tasks(&tasks, &before).score, 0);
}

#[test]
fn soft_delete_versus_permanent_delete() {
    let before = snapshot(vec![c(vec![Node::file("a.txt")])], vec![]);

    let soft = snapshot(vec![c(vec![])], vec![RecycleEntry::new(Node::file("a.txt"), "C:")]);
    let records = diff_snapshots(&before, &soft).unwrap();
    assert_eq!(records, vec![DiffRecord::at(DiffKind::RemovedFile, "C:\\a.txt", "a.txt")]);

    let hard = snapshot(vec![c(vec![])], vec![]);
    let records = diff_snapshots(&before, &hard).unwrap();
    assert_eq!(
        records,
        vec![DiffRecord::at(DiffKind::PermanentlyDeletedFile, "C:\\a.txt", "a.txt")]
    );
}

#[test]
fn mixed_changes_each_reported_once() {
    let before = snapshot(
        vec![
            c(vec![
                Node::folder("Docs", vec![Node::file("draft.txt"), Node::file("keep.txt")]),
                Node::file("Report.txt"),
                Node::file("trash.txt"),
            ]),
            Node::folder("OneDrive", vec![]),
        ],
        vec![RecycleEntry::new(Node::file("back.txt"), "C:\\Docs")],
    );
    let after = snapshot(
        vec![
            c(vec![
                Node::folder(
                    "Docs",
                    vec![
                        Node::file("final.txt"),
                        Node::file("keep.txt"),
                        Node::file("back.txt"),
                    ],
                ),
                Node::folder("Photos", vec![]),
            ]),
            Node::folder("OneDrive", vec![Node::file("Report.txt"), Node::file("keep.txt")]),
        ],
        vec![RecycleEntry::new(Node::file("trash.txt"), "C:")],
    );

    let records = diff_snapshots(&before, &after).unwrap();
    assert_eq!(
        records,
        vec![
            DiffRecord::at(DiffKind::AddedFolder, "C:\\Photos", "Photos"),
            DiffRecord::at(DiffKind::RemovedFile, "C:\\trash.txt", "trash.txt"),
            DiffRecord::change(
                DiffKind::MovedFile,
                "C:\\Report.txt",
                "OneDrive\\Report.txt",
                "Report.txt"
            ),
            DiffRecord::change(
                DiffKind::RenamedFile,
                "C:\\Docs\\draft.txt",
                "C:\\Docs\\final.txt",
                "final.txt"
            ),
            DiffRecord::change(
                DiffKind::CopiedFile,
                "C:\\Docs\\keep.txt",
                "OneDrive\\keep.txt",
                "keep.txt"
            ),
            DiffRecord::at(DiffKind::RestoredFile, "C:\\Docs\\back.txt", "back.txt"),
        ]
    );

    let tasks = tasks_for(&records);
    let report = evaluate_tasks(&tasks, &after);
    assert_eq!(report.completed, report.total);
    assert_eq!(report.score, 100);
}

#[test]
fn snapshot_files_round_trip() {
    let json = r#"{
        "structure": {"roots": [
            {"id": "c", "name": "C:", "type": "folder", "children": [
                {"id": "d", "name": "Docs", "type": "folder", "children": [
                    {"id": "a", "name": "a.txt", "type": "file", "content": "hi", "size": 2}
                ]}
            ]}
        ]},
        "recycleBin": [
            {"id": "o", "name": "old.txt", "type": "file", "originalPath": "C:\\Docs", "deletedAt": "2024-05-01T10:00:00Z"}
        ]
    }"#;
    let parsed: Snapshot = serde_json::from_str(json).unwrap();
    let reparsed: Snapshot = serde_json::from_str(&serde_json::to_string(&parsed).unwrap()).unwrap();
    assert_eq!(parsed, reparsed);
    assert!(diff_snapshots(&parsed, &reparsed).unwrap().is_empty());
}

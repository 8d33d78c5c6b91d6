//! Snapshot diffing
//!
//! [`interpret`] classifies the change between two flattened snapshots into
//! categories; [`normalize`] turns the categories into a flat list of
//! [`DiffRecord`]s. [`diff_snapshots`] runs both on a pair of [`Snapshot`]s.
//!
//! # Example
//!
//! ```rust
//! use explorekit::diff::{diff_snapshots, DiffKind};
//! use explorekit::fs::{Node, Snapshot, SystemRoot};
//!
//! let before = Snapshot::new(SystemRoot::new(vec![Node::folder("C:", vec![])]), vec![]);
//! let after = Snapshot::new(
//!     SystemRoot::new(vec![Node::folder("C:", vec![Node::file("Notes.txt")])]),
//!     vec![],
//! );
//!
//! let records = diff_snapshots(&before, &after)?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].kind, DiffKind::AddedFile);
//! assert_eq!(records[0].path(), Some("C:\\Notes.txt"));
//! # Ok::<(), explorekit::Error>(())
//! ```

mod interpret;
mod record;

pub use interpret::{interpret, CategorizedDiffs, DiffItem, PathChange};
pub use record::{normalize, DiffKind, DiffRecord, DiffTarget};

use crate::error::Result;
use crate::fs::Snapshot;

/// Diff two snapshots into records.
///
/// Fails only when either tree contains a repeated node id.
pub fn diff_snapshots(initial: &Snapshot, target: &Snapshot) -> Result<Vec<DiffRecord>> {
    let initial_flat = initial.flatten()?;
    let target_flat = target.flatten()?;
    let diffs = interpret(
        &initial_flat,
        &target_flat,
        &initial.recycle_bin,
        &target.recycle_bin,
    );
    Ok(normalize(diffs))
}

//! Read-only view of a live file-system state.

use super::node::{Node, SystemRoot};
use super::recycle::RecycleEntry;

/// Live state as seen by the check evaluator.
///
/// Implementations hand out shared references only; evaluation can never
/// mutate the tree or the recycle bin through this trait.
pub trait LiveState {
    /// The live roots.
    fn system(&self) -> &SystemRoot;

    /// The live recycle bin.
    fn recycle_bin(&self) -> &[RecycleEntry];

    /// Check if a folder (or root) exists at `path`.
    fn folder_exists(&self, path: &str) -> bool {
        self.system().folder_at(path).is_some()
    }

    /// Check if a file exists at `path`.
    fn file_exists(&self, path: &str) -> bool {
        self.system().file_at(path).is_some()
    }

    /// File node at `path`.
    fn file_at(&self, path: &str) -> Option<&Node> {
        self.system().file_at(path)
    }
}

//! Virtual file system
//!
//! - [`Node`] and [`SystemRoot`]: the tree model and multi-root container
//! - [`RecycleEntry`]: soft-deleted items
//! - [`Snapshot`]: frozen tree + bin pairs fed to the diff pipeline
//! - [`Session`]: the mutable live state owned by the interactive layer
//! - [`LiveState`]: read-only view consumed by the check evaluator

mod node;
mod recycle;
mod session;
mod snapshot;
mod traits;

pub use node::{new_id, unique_child_name, Node, NodeType, Structure, SystemRoot, ZipMeta};
pub use recycle::{bin_has_ancestor_folder, bin_has_item, RecycleEntry};
pub(crate) use recycle::deserialize_bin;
pub use session::{Action, ActionEvent, Session, SessionConfig};
pub use snapshot::Snapshot;
pub use traits::LiveState;

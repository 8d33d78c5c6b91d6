//! Explorekit - file explorer exercise engine
//!
//! A virtual multi-root file system for file-management exercises. Teachers
//! build a start and a target state; the difference between the two becomes
//! a list of declarative tasks. Students work in a live [`fs::Session`] and
//! their state is scored against those tasks without side effects.
//!
//! Pipeline: [`flatten()`] → [`diff::interpret`] → [`diff::normalize`] →
//! [`task::synthesize`] → [`task::to_dsl_tasks`] / [`task::validate`] →
//! [`eval::evaluate`].
//!
//! # Example
//!
//! ```rust
//! use explorekit::diff::diff_snapshots;
//! use explorekit::eval::evaluate_tasks;
//! use explorekit::fs::{Node, Session, SystemRoot};
//! use explorekit::task::{generate_tasks, Task};
//!
//! let start = SystemRoot::new(vec![Node::folder(
//!     "C:",
//!     vec![Node::folder("Docs", vec![Node::file("a.txt")])],
//! )]);
//!
//! // Teacher: rename a.txt to b.txt in a scratch session.
//! let mut teacher = Session::new(start.clone());
//! let before = teacher.snapshot();
//! teacher.rename("C:\\Docs\\a.txt", "b.txt")?;
//! let records = diff_snapshots(&before, &teacher.snapshot())?;
//! let tasks: Vec<Task> = generate_tasks(&records).into_iter().map(Task::from).collect();
//! assert_eq!(tasks[0].type_name(), Some("file-renamed"));
//!
//! // Student: same rename, scored.
//! let mut student = Session::new(start);
//! assert_eq!(evaluate_tasks(&tasks, &student).score, 0);
//! student.rename("C:\\Docs\\a.txt", "b.txt")?;
//! assert_eq!(evaluate_tasks(&tasks, &student).score, 100);
//! # Ok::<(), explorekit::Error>(())
//! ```

pub mod config;
pub mod diff;
mod error;
pub mod eval;
pub mod flatten;
pub mod fs;
pub mod path;
pub mod task;

pub use config::{ExerciseConfig, ExerciseMeta};
pub use error::{Error, Result};
pub use flatten::{flatten, FlatFact};

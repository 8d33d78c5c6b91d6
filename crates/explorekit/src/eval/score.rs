//! Evaluation outcomes and scoring.

use serde::Serialize;

use crate::task::Check;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    #[serde(flatten)]
    pub check: Check,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    pub description: String,
    pub completed: bool,
    pub checks: Vec<CheckOutcome>,
}

/// Per-task outcomes plus the rounded score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub tasks: Vec<TaskOutcome>,
    pub completed: usize,
    pub total: usize,
    /// 0..=100
    pub score: u32,
}

impl ScoreReport {
    pub fn new(tasks: Vec<TaskOutcome>) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        let total = tasks.len();
        Self {
            tasks,
            completed,
            total,
            score: score(completed, total),
        }
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.total
    }
}

/// `round(100 * completed / total)`, 0 when there are no tasks.
pub fn score(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as f64;
    (completed * 100.0 / total as f64).round() as u32
}

//! Task DSL validation.

use serde::Serialize;
use serde_json::Value;

use super::{DslTask, TaskType};

/// Validation outcome: one message per violation, indexed by task position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// First error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Validate a raw `tasks` payload.
///
/// `null` counts as no tasks and is valid. Anything else must be an array of
/// objects with a known DSL `type` and every required field present: arrays
/// count as present, strings must be non-blank, `null` is missing.
pub fn validate_tasks(tasks: &Value) -> Validation {
    let list = match tasks {
        Value::Null => return Validation::from_errors(Vec::new()),
        Value::Array(list) => list,
        _ => return Validation::from_errors(vec!["tasks must be an array".to_string()]),
    };

    let mut errors = Vec::new();
    for (index, task) in list.iter().enumerate() {
        let Some(fields) = task.as_object() else {
            errors.push(format!("tasks[{index}] must be an object"));
            continue;
        };

        let type_name = match fields.get("type") {
            Some(Value::String(t)) if !t.trim().is_empty() => t.as_str(),
            _ => {
                errors.push(format!("tasks[{index}].type is required"));
                continue;
            }
        };
        let Some(task_type) = TaskType::parse(type_name) else {
            errors.push(format!("tasks[{index}].type \"{type_name}\" is unknown"));
            continue;
        };

        for field in task_type.required_fields() {
            if !has_value(fields.get(*field)) {
                errors.push(format!(
                    "tasks[{index}].{field} is required for type \"{type_name}\""
                ));
            }
        }

        if fields.get("strict").is_some_and(|strict| !strict.is_boolean()) {
            errors.push(format!("tasks[{index}].strict must be boolean when provided"));
        }
    }

    Validation::from_errors(errors)
}

/// Validate typed DSL tasks (same rules and messages as [`validate_tasks`]).
pub fn validate(tasks: &[DslTask]) -> Validation {
    match serde_json::to_value(tasks) {
        Ok(value) => validate_tasks(&value),
        Err(e) => Validation::from_errors(vec![format!("tasks could not be serialized: {e}")]),
    }
}

fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskAction;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_is_valid() {
        assert!(validate_tasks(&Value::Null).valid);
    }

    #[test]
    fn non_array_is_rejected() {
        let result = validate_tasks(&json!({"type": "move"}));
        assert_eq!(result.errors, vec!["tasks must be an array"]);
    }

    #[test]
    fn reports_every_violation_in_order() {
        let result = validate_tasks(&json!([
            {"type": "move", "subjectId": "n1", "fromPath": "  ", "toPath": null},
            "not a task",
            {"description": "no type"},
            {"type": "teleport"},
            {"type": "zip-create", "inputIds": [], "outputName": "a.zip", "outputPath": "C:\\a.zip", "strict": "yes"}
        ]));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "tasks[0].fromPath is required for type \"move\"",
                "tasks[0].toPath is required for type \"move\"",
                "tasks[1] must be an object",
                "tasks[2].type is required",
                "tasks[3].type \"teleport\" is unknown",
                "tasks[4].strict must be boolean when provided",
            ]
        );
        assert_eq!(result.first_error(), Some("tasks[0].fromPath is required for type \"move\""));
    }

    #[test]
    fn typed_tasks_validate_the_same_way() {
        let complete = DslTask::new(TaskAction::Delete {
            subject_id: Some("n1".into()),
            from_path: Some("C:\\a.txt".into()),
        });
        let incomplete = DslTask::new(TaskAction::ZipExtract {
            archive_id: None,
            dest_path: Some("C:\\Out".into()),
        });

        assert!(validate(std::slice::from_ref(&complete)).valid);
        assert_eq!(
            validate(&[complete, incomplete]).errors,
            vec!["tasks[1].archiveId is required for type \"zip-extract\""]
        );
    }
}

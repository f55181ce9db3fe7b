//! Request payload validation.
//!
//! Every payload that reaches the store goes through one of the functions in
//! this module first. They operate on raw JSON so that each failure can be
//! reported against the field that caused it.

use crate::{Project, ProjectChanges, Task, TaskChanges};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Width of the text columns in the relational layout.
pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a valid identifier: `{value}`")]
    InvalidIdentifierFormat { field: &'static str, value: String },

    #[error("field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

pub fn project(payload: &Value) -> Result<Project, ValidationError> {
    let fields = object(payload)?;

    Ok(Project {
        id: optional_identifier(fields, "id")?.unwrap_or_else(Uuid::new_v4),
        name: required_text(fields, "name")?,
        description: optional_text(fields, "description")?,
    })
}

pub fn task(payload: &Value) -> Result<Task, ValidationError> {
    let fields = object(payload)?;

    Ok(Task {
        id: optional_identifier(fields, "id")?.unwrap_or_else(Uuid::new_v4),
        project_id: optional_identifier(fields, "project_id")?
            .ok_or(ValidationError::MissingField("project_id"))?,
        name: required_text(fields, "name")?,
        description: optional_text(fields, "description")?,
        completed: flag(fields, "completed")?,
    })
}

/// Validates an update body. A supplied `id` must still be well-formed even
/// though it is ignored.
pub fn project_changes(payload: &Value) -> Result<ProjectChanges, ValidationError> {
    let fields = object(payload)?;
    optional_identifier(fields, "id")?;

    Ok(ProjectChanges {
        name: required_text(fields, "name")?,
        description: optional_text(fields, "description")?,
    })
}

/// Validates an update body. `id` and `project_id` are checked for format
/// and then ignored.
pub fn task_changes(payload: &Value) -> Result<TaskChanges, ValidationError> {
    let fields = object(payload)?;
    optional_identifier(fields, "id")?;
    optional_identifier(fields, "project_id")?;

    Ok(TaskChanges {
        name: required_text(fields, "name")?,
        description: optional_text(fields, "description")?,
        completed: flag(fields, "completed")?,
    })
}

/// Parses an identifier taken from a path segment or a payload field.
pub fn identifier(field: &'static str, raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidIdentifierFormat {
        field,
        value: raw.to_string(),
    })
}

fn object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload.as_object().ok_or(ValidationError::InvalidType {
        field: "body",
        expected: "a JSON object",
    })
}

// null and absent are the same thing
fn present<'a>(fields: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    fields.get(field).filter(|value| !value.is_null())
}

fn optional_identifier(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Uuid>, ValidationError> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::String(raw)) => identifier(field, raw).map(Some),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a UUID string",
        }),
    }
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match optional_text(fields, field)? {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::String(text)) if text.chars().count() > MAX_TEXT_LEN => {
            Err(ValidationError::TooLong {
                field,
                max: MAX_TEXT_LEN,
            })
        }
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn flag(fields: &Map<String, Value>, field: &'static str) -> Result<bool, ValidationError> {
    let invalid = || ValidationError::InvalidType {
        field,
        expected: "a boolean",
    };

    match present(fields, field) {
        None => Ok(false),
        Some(Value::Bool(value)) => Ok(*value),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(value) if value == 0.0 => Ok(false),
            Some(value) if value == 1.0 => Ok(true),
            _ => Err(invalid()),
        },
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
            "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
            _ => Err(invalid()),
        },
        Some(_) => Err(invalid()),
    }
}

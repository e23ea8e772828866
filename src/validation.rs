//! Parse-and-validate for incoming student records.
//!
//! Candidates arrive as untyped JSON from the client. Everything is checked
//! here, every violation is collected, and the result is either a normalized
//! [`StudentRecord`] or the full list of field errors.

use crate::model::StudentRecord;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const STUDENT_ID_MIN: usize = 3;
pub const STUDENT_ID_MAX: usize = 20;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;
pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 4.0;
pub const REMARKS_MAX: usize = 200;

static STUDENT_ID_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("student id pattern"));

// ASCII digits only; `\d` would also admit other Unicode digits.
static DECIMAL_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("decimal pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

pub fn parse_student(input: &Value) -> Result<StudentRecord, ValidationErrors> {
    let Some(obj) = input.as_object() else {
        return Err(ValidationErrors(vec![FieldError {
            field: "record",
            message: "Student record must be an object".to_string(),
        }]));
    };

    let mut errors = Collector::default();
    let student_id = parse_student_id(obj, &mut errors);
    let name = parse_name(obj, &mut errors);
    let grade = parse_grade(obj.get("grade"), &mut errors);
    let status = parse_status(obj.get("status"), &mut errors);
    let remarks = parse_remarks(obj.get("remarks"), &mut errors);

    match (student_id, name, grade, status, remarks) {
        (Some(student_id), Some(name), Some(grade), Some(status), Some(remarks))
            if errors.0.is_empty() =>
        {
            Ok(StudentRecord {
                student_id,
                name,
                grade,
                status,
                remarks,
            })
        }
        _ => Err(ValidationErrors(errors.0)),
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    label: &str,
    errors: &mut Collector,
) -> Option<&'a str> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, format!("{label} is required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.push(field, format!("{label} must be a string"));
            None
        }
    }
}

fn parse_student_id(obj: &Map<String, Value>, errors: &mut Collector) -> Option<String> {
    let raw = required_str(obj, "studentId", "Student ID", errors)?;
    let len = raw.chars().count();
    let before = errors.0.len();
    if len < STUDENT_ID_MIN {
        errors.push(
            "studentId",
            format!("Student ID must be at least {STUDENT_ID_MIN} characters"),
        );
    } else if len > STUDENT_ID_MAX {
        errors.push(
            "studentId",
            format!("Student ID must be less than {STUDENT_ID_MAX} characters"),
        );
    }
    if !STUDENT_ID_CHARSET.is_match(raw) {
        errors.push(
            "studentId",
            "Student ID can only contain letters, numbers, and hyphens",
        );
    }
    (errors.0.len() == before).then(|| raw.to_string())
}

fn parse_name(obj: &Map<String, Value>, errors: &mut Collector) -> Option<String> {
    let raw = required_str(obj, "name", "Name", errors)?;
    let len = raw.chars().count();
    if len < NAME_MIN {
        errors.push("name", format!("Name must be at least {NAME_MIN} characters"));
        return None;
    }
    if len > NAME_MAX {
        errors.push("name", format!("Name must be less than {NAME_MAX} characters"));
        return None;
    }
    Some(raw.to_string())
}

/// Accepts a JSON number or a decimal-looking string, then applies the bound.
fn parse_grade(value: Option<&Value>, errors: &mut Collector) -> Option<f64> {
    let number = match value {
        None | Some(Value::Null) => {
            errors.push("grade", "Grade is required");
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => coerce_decimal(s),
        Some(_) => None,
    };
    let Some(grade) = number.filter(|g| g.is_finite()) else {
        errors.push("grade", "Grade must be a number");
        return None;
    };
    if grade < GRADE_MIN {
        errors.push("grade", "Grade must be at least 0");
        return None;
    }
    if grade > GRADE_MAX {
        errors.push("grade", "Grade must be at most 4.0");
        return None;
    }
    Some(grade)
}

fn coerce_decimal(text: &str) -> Option<f64> {
    if !DECIMAL_TEXT.is_match(text) || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

fn parse_status(value: Option<&Value>, errors: &mut Collector) -> Option<bool> {
    match value {
        None | Some(Value::Null) => Some(true),
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push("status", "Status must be a boolean");
            None
        }
    }
}

/// `Some(None)` is a valid absent remark; `None` means the field failed.
fn parse_remarks(value: Option<&Value>, errors: &mut Collector) -> Option<Option<String>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => {
            if s.chars().count() > REMARKS_MAX {
                errors.push(
                    "remarks",
                    format!("Remarks must be less than {REMARKS_MAX} characters"),
                );
                return None;
            }
            if s.trim().is_empty() {
                Some(None)
            } else {
                Some(Some(s.clone()))
            }
        }
        Some(_) => {
            errors.push("remarks", "Remarks must be a string");
            None
        }
    }
}

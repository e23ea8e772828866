//! Student data-access operations.
//!
//! Each operation validates, enforces `studentId` uniqueness, performs its
//! storage calls, marks the list view stale on success and reports exactly one
//! of a success message or a user-safe error. Storage diagnostics are logged
//! here and never handed back to the caller.

use crate::invalidation::ListInvalidation;
use crate::model::{Student, StudentRecord};
use crate::seed::SEED_STUDENTS;
use crate::store::{StoreError, StudentStore};
use crate::validation::{parse_student, ValidationErrors};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const MSG_CREATED: &str = "Student created successfully";
pub const MSG_UPDATED: &str = "Student updated successfully";
pub const MSG_DELETED: &str = "Student deleted successfully";
pub const MSG_SEEDED: &str = "Students seeded successfully";

pub const MSG_DUPLICATE: &str = "Student ID already exists";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch students";
pub const MSG_CREATE_FAILED: &str = "Failed to create student";
pub const MSG_UPDATE_FAILED: &str = "Failed to update student";
pub const MSG_DELETE_FAILED: &str = "Failed to delete student";
pub const MSG_SEED_FAILED: &str = "Failed to seed students";
pub const MSG_LOAD_FAILED: &str =
    "Failed to load or seed students. Please check your database connection.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Success {
    pub success: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{}", MSG_DUPLICATE)]
    Duplicate,
    #[error("{0}")]
    Storage(&'static str),
}

impl ActionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Duplicate => "duplicate_student_id",
            Self::Storage(_) => "storage_failed",
        }
    }
}

pub type ActionResult<T = Success> = Result<T, ActionError>;

fn success(message: &'static str) -> Success {
    Success { success: message }
}

fn storage_failure(e: StoreError, message: &'static str) -> ActionError {
    warn!(error = %e, "{}", message);
    ActionError::Storage(message)
}

/// A unique-constraint rejection from storage is the same duplicate the
/// pre-check reports; it only shows up when two writers race.
fn write_failure(e: StoreError, message: &'static str) -> ActionError {
    match e {
        StoreError::Conflict(student_id) => {
            debug!(%student_id, "storage rejected duplicate student id");
            ActionError::Duplicate
        }
        other => storage_failure(other, message),
    }
}

fn validated(input: &Value) -> ActionResult<StudentRecord> {
    parse_student(input).map_err(|errors| {
        debug!(%errors, "student record rejected");
        ActionError::Validation(errors)
    })
}

pub fn list_students<S: StudentStore>(store: &S) -> ActionResult<Vec<Student>> {
    store
        .list_ordered()
        .map_err(|e| storage_failure(e, MSG_FETCH_FAILED))
}

pub fn create_student<S: StudentStore>(
    store: &S,
    list: &mut ListInvalidation,
    input: &Value,
) -> ActionResult {
    let record = validated(input)?;

    match store.find_by_student_id(&record.student_id) {
        Ok(Some(_)) => {
            debug!(student_id = %record.student_id, "create rejected: duplicate student id");
            return Err(ActionError::Duplicate);
        }
        Ok(None) => {}
        Err(e) => return Err(storage_failure(e, MSG_CREATE_FAILED)),
    }

    let student = Student::new(record, Utc::now());
    store
        .insert(&student)
        .map_err(|e| write_failure(e, MSG_CREATE_FAILED))?;

    let generation = list.mark_stale();
    info!(
        id = %student.id,
        student_id = %student.record.student_id,
        generation,
        "student created"
    );
    Ok(success(MSG_CREATED))
}

/// Full replace: every field comes from `input`, with schema defaults for the
/// optional ones.
pub fn update_student<S: StudentStore>(
    store: &S,
    list: &mut ListInvalidation,
    id: &str,
    input: &Value,
) -> ActionResult {
    let record = validated(input)?;

    match store.find_conflict_excluding(&record.student_id, id) {
        Ok(others) if !others.is_empty() => {
            debug!(%id, student_id = %record.student_id, "update rejected: duplicate student id");
            return Err(ActionError::Duplicate);
        }
        Ok(_) => {}
        Err(e) => return Err(storage_failure(e, MSG_UPDATE_FAILED)),
    }

    store
        .replace(id, &record, Utc::now())
        .map_err(|e| write_failure(e, MSG_UPDATE_FAILED))?;

    let generation = list.mark_stale();
    info!(%id, student_id = %record.student_id, generation, "student updated");
    Ok(success(MSG_UPDATED))
}

/// Flips the active flag by resubmitting the whole record through
/// [`update_student`].
pub fn set_student_status<S: StudentStore>(
    store: &S,
    list: &mut ListInvalidation,
    id: &str,
    status: bool,
) -> ActionResult {
    let current = match store.find_by_id(id) {
        Ok(Some(s)) => s,
        Ok(None) => {
            let missing = StoreError::NotFound(id.to_string());
            return Err(storage_failure(missing, MSG_UPDATE_FAILED));
        }
        Err(e) => return Err(storage_failure(e, MSG_UPDATE_FAILED)),
    };
    let r = current.record;
    let input = json!({
        "studentId": r.student_id,
        "name": r.name,
        "grade": r.grade,
        "status": status,
        "remarks": r.remarks,
    });
    update_student(store, list, id, &input)
}

pub fn delete_student<S: StudentStore>(
    store: &S,
    list: &mut ListInvalidation,
    id: &str,
) -> ActionResult {
    store
        .delete(id)
        .map_err(|e| storage_failure(e, MSG_DELETE_FAILED))?;

    let generation = list.mark_stale();
    info!(%id, generation, "student deleted");
    Ok(success(MSG_DELETED))
}

/// Inserts each bootstrap record whose `studentId` is not taken yet.
///
/// Safe to run repeatedly; records already present are skipped silently.
pub fn seed_if_empty<S: StudentStore>(store: &S, list: &mut ListInvalidation) -> ActionResult {
    let inserted = store
        .atomically(|tx| {
            let mut inserted = 0usize;
            for seed in &SEED_STUDENTS {
                if tx.find_by_student_id(seed.student_id)?.is_some() {
                    continue;
                }
                tx.insert(&Student::new(seed.to_record(), Utc::now()))?;
                inserted += 1;
            }
            Ok(inserted)
        })
        .map_err(|e| storage_failure(e, MSG_SEED_FAILED))?;

    if inserted > 0 {
        let generation = list.mark_stale();
        info!(inserted, generation, "seeded students");
    } else {
        debug!("seed skipped: all seed records present");
    }
    Ok(success(MSG_SEEDED))
}

/// First-render read: list, and when the store is empty seed it once and list
/// again. An empty store after seeding is reported as a failure.
pub fn load_students<S: StudentStore>(
    store: &S,
    list: &mut ListInvalidation,
) -> ActionResult<Vec<Student>> {
    let first_error = match list_students(store) {
        Ok(students) if !students.is_empty() => return Ok(students),
        Ok(_) => None,
        Err(e) => Some(e),
    };

    if let Err(e) = seed_if_empty(store, list) {
        debug!(error = %e, "bootstrap seed failed");
    }

    match list_students(store) {
        Ok(students) if !students.is_empty() => Ok(students),
        _ => Err(first_error.unwrap_or(ActionError::Storage(MSG_LOAD_FAILED))),
    }
}

use crate::model::{Student, StudentRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("student id {0} is already taken")]
    Conflict(String),
    #[error("no student with id {0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Query/mutation surface the student operations need from storage.
pub trait StudentStore {
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Student>>;
    fn find_by_student_id(&self, student_id: &str) -> StoreResult<Option<Student>>;
    /// Students holding `student_id` other than the row `exclude_id`.
    fn find_conflict_excluding(&self, student_id: &str, exclude_id: &str)
        -> StoreResult<Vec<Student>>;
    fn insert(&self, student: &Student) -> StoreResult<()>;
    /// Full replace of the mutable fields; `created_at` is left alone.
    fn replace(&self, id: &str, record: &StudentRecord, updated_at: DateTime<Utc>)
        -> StoreResult<()>;
    fn delete(&self, id: &str) -> StoreResult<()>;
    /// All students, newest `created_at` first.
    fn list_ordered(&self) -> StoreResult<Vec<Student>>;
    fn count(&self) -> StoreResult<i64>;
    /// Runs `f` atomically; an `Err` from `f` rolls everything back.
    fn atomically<T, F>(&self, f: F) -> StoreResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> StoreResult<T>;
}

const STUDENT_COLUMNS: &str =
    "id, student_id, name, grade, status, remarks, created_at, updated_at";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    let created_raw: String = row.get(6)?;
    let updated_raw: Option<String> = row.get(7)?;
    let created_at = parse_timestamp(6, &created_raw)?;
    let updated_at = match updated_raw {
        Some(raw) => parse_timestamp(7, &raw)?,
        None => created_at,
    };
    let status: i64 = row.get(4)?;
    Ok(Student {
        id: row.get(0)?,
        record: StudentRecord {
            student_id: row.get(1)?,
            name: row.get(2)?,
            grade: row.get(3)?,
            status: status != 0,
            remarks: row.get(5)?,
        },
        created_at,
        updated_at,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(f, _)
            if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn map_write_err(e: rusqlite::Error, student_id: &str) -> StoreError {
    if is_unique_violation(&e) {
        StoreError::Conflict(student_id.to_string())
    } else {
        StoreError::Sqlite(e)
    }
}

impl StudentStore for Connection {
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?");
        Ok(self.query_row(&sql, [id], row_to_student).optional()?)
    }

    fn find_by_student_id(&self, student_id: &str) -> StoreResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?");
        Ok(self
            .query_row(&sql, [student_id], row_to_student)
            .optional()?)
    }

    fn find_conflict_excluding(
        &self,
        student_id: &str,
        exclude_id: &str,
    ) -> StoreResult<Vec<Student>> {
        let sql =
            format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ? AND id <> ?");
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt
            .query_map([student_id, exclude_id], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert(&self, student: &Student) -> StoreResult<()> {
        let r = &student.record;
        self.execute(
            "INSERT INTO students(
               id,
               student_id,
               name,
               grade,
               status,
               remarks,
               created_at,
               updated_at
             ) VALUES(?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &student.id,
                &r.student_id,
                &r.name,
                r.grade,
                r.status as i64,
                r.remarks.as_deref(),
                format_timestamp(student.created_at),
                format_timestamp(student.updated_at),
            ),
        )
        .map_err(|e| map_write_err(e, &r.student_id))?;
        Ok(())
    }

    fn replace(
        &self,
        id: &str,
        record: &StudentRecord,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let changed = self
            .execute(
                "UPDATE students
                 SET student_id = ?, name = ?, grade = ?, status = ?, remarks = ?, updated_at = ?
                 WHERE id = ?",
                (
                    &record.student_id,
                    &record.name,
                    record.grade,
                    record.status as i64,
                    record.remarks.as_deref(),
                    format_timestamp(updated_at),
                    id,
                ),
            )
            .map_err(|e| map_write_err(e, &record.student_id))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let changed = self.execute("DELETE FROM students WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn list_ordered(&self) -> StoreResult<Vec<Student>> {
        // rowid breaks ties between rows created within the same millisecond.
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn count(&self) -> StoreResult<i64> {
        Ok(self.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?)
    }

    fn atomically<T, F>(&self, f: F) -> StoreResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> StoreResult<T>,
    {
        let tx = self.unchecked_transaction()?;
        let out = f(&*tx)?;
        tx.commit()?;
        Ok(out)
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A validated, normalized student record as accepted by create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub grade: f64,
    pub status: bool,
    pub remarks: Option<String>,
}

/// A stored student row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(flatten)]
    pub record: StudentRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(record: StudentRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            record,
            created_at: now,
            updated_at: now,
        }
    }
}

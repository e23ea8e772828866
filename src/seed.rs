use crate::model::StudentRecord;

pub struct SeedStudent {
    pub student_id: &'static str,
    pub name: &'static str,
    pub grade: f64,
    pub status: bool,
    pub remarks: &'static str,
}

impl SeedStudent {
    pub fn to_record(&self) -> StudentRecord {
        StudentRecord {
            student_id: self.student_id.to_string(),
            name: self.name.to_string(),
            grade: self.grade,
            status: self.status,
            remarks: Some(self.remarks.to_string()),
        }
    }
}

const fn seed(
    student_id: &'static str,
    name: &'static str,
    grade: f64,
    status: bool,
    remarks: &'static str,
) -> SeedStudent {
    SeedStudent {
        student_id,
        name,
        grade,
        status,
        remarks,
    }
}

/// Bootstrap dataset inserted when a workspace has no students yet.
pub const SEED_STUDENTS: [SeedStudent; 10] = [
    seed("F22CSC001", "Ahmed Khan", 3.7, true, "Excellent student"),
    seed("F22CSC002", "Fatima Ali", 3.9, true, "Outstanding performance"),
    seed("F22CSC003", "Muhammad Hassan", 3.2, true, "Good progress"),
    seed("F22CSC004", "Ayesha Malik", 2.8, false, "Needs improvement"),
    seed("F22CSC005", "Omar Farooq", 3.5, true, "Consistent performer"),
    seed("F22CSC006", "Zainab Qureshi", 3.0, true, "Average performance"),
    seed("F22CSC007", "Bilal Ahmed", 2.5, false, "Attendance issues"),
    seed("F22CSC008", "Sana Mahmood", 3.8, true, "Exceptional work"),
    seed("F22CSC009", "Imran Hussain", 3.3, true, "Improving steadily"),
    seed("F22CSC010", "Nadia Iqbal", 2.9, false, "Requires counseling"),
];

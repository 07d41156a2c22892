//! Response shapes and helpers shared across route groups.

use db::models::attendance_event::Model as EventModel;
use db::models::student::Model as StudentModel;
use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct StudentResponse {
    pub id: i64,
    pub full_name: String,
    pub roll_no: String,
    pub class_name: String,
    pub student_email: String,
    pub parent_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StudentModel> for StudentResponse {
    fn from(m: StudentModel) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            roll_no: m.roll_no,
            class_name: m.class_name,
            student_email: m.student_email,
            parent_email: m.parent_email,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct EventResponse {
    pub id: i64,
    pub direction: String,
    pub recorded_at: String,
    pub reason: Option<String>,
    pub expected_return: Option<String>,
}

impl From<EventModel> for EventResponse {
    fn from(m: EventModel) -> Self {
        Self {
            id: m.id,
            direction: m.direction.to_string(),
            recorded_at: m.recorded_at.to_rfc3339(),
            reason: m.reason,
            expected_return: m.expected_return,
        }
    }
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

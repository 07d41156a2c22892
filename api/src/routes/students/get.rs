use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use chrono::SecondsFormat;

use crate::response::ApiResponse;
use crate::routes::common::{EventResponse, StudentResponse, csv_escape};
use crate::state::AppState;
use db::models::attendance_event::Model as EventModel;
use db::models::student::Model as StudentModel;

/// GET /students
///
/// Lists the full roster in creation order.
pub async fn list_students(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<StudentResponse>>>) {
    match StudentModel::list_all(state.db()).await {
        Ok(students) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                students.into_iter().map(StudentResponse::from).collect(),
                "Students retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /students/{student_id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    match StudentModel::find_by_id(state.db(), student_id).await {
        Ok(Some(student)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                student.into(),
                "Student retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found.")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /students/{student_id}/attendance
///
/// A student's full event log in insertion order, for the admin view.
pub async fn list_student_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<EventResponse>>>) {
    let db = state.db();

    match StudentModel::find_by_id(db, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found.")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match EventModel::history_for_student(db, student_id).await {
        Ok(events) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                events.into_iter().map(EventResponse::from).collect(),
                "Attendance records retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

fn csv_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    headers
}

fn plain_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers
}

/// GET /students/export
///
/// The roster as a CSV download.
pub async fn export_students_csv(
    State(state): State<AppState>,
) -> (StatusCode, (HeaderMap, String)) {
    let students = match StudentModel::list_all(state.db()).await {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                (plain_headers(), "error".to_string()),
            );
        }
    };

    let mut csv = String::from("id,full_name,roll_no,class_name,student_email,parent_email\n");
    for s in students {
        let row = format!(
            "{},{},{},{},{},{}\n",
            s.id,
            csv_escape(&s.full_name),
            csv_escape(&s.roll_no),
            csv_escape(&s.class_name),
            csv_escape(&s.student_email),
            csv_escape(&s.parent_email),
        );
        csv.push_str(&row);
    }

    (StatusCode::OK, (csv_headers("students.csv"), csv))
}

/// GET /students/{student_id}/attendance/export
///
/// One student's event log as a CSV download.
pub async fn export_student_attendance_csv(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, (HeaderMap, String)) {
    let db = state.db();

    let events = match EventModel::history_for_student(db, student_id).await {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                (plain_headers(), "error".to_string()),
            );
        }
    };

    let mut csv = String::from("id,student_id,direction,recorded_at,reason,expected_return\n");
    for ev in events {
        let recorded_at = ev
            .recorded_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let row = format!(
            "{},{},{},{},{},{}\n",
            ev.id,
            ev.student_id,
            ev.direction,
            csv_escape(&recorded_at),
            csv_escape(ev.reason.as_deref().unwrap_or("")),
            csv_escape(ev.expected_return.as_deref().unwrap_or("")),
        );
        csv.push_str(&row);
    }

    let filename = format!("attendance_{student_id}.csv");
    (StatusCode::OK, (csv_headers(&filename), csv))
}

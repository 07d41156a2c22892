use axum::{Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::StudentResponse;
use crate::routes::students::common::CreateStudentRequest;
use crate::state::AppState;
use db::models::student::Model as StudentModel;

/// POST /students
///
/// Adds a student to the roster. Admin-only access.
///
/// ### Responses
/// - `201 Created`: full roster entry
/// - `400 Bad Request`: validation failure
/// - `409 Conflict`: duplicate roll number or student email
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let db = state.db();

    // Roll numbers identify students across the hostel; report the clash
    // before relying on the constraint.
    match StudentModel::find_by_roll_no(db, &req.roll_no).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "Roll number already exists. Please use a unique roll number.",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match StudentModel::create(
        db,
        &req.full_name,
        &req.roll_no,
        &req.class_name,
        &req.student_email,
        &req.parent_email,
    )
    .await
    {
        Ok(student) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                student.into(),
                format!("Student {} added successfully!", req.full_name),
            )),
        ),
        Err(e) => {
            if e.to_string().contains("UNIQUE constraint failed") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A student with this roll number or email already exists",
                    )),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Database error: {e}"))),
                )
            }
        }
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use common::format_validation_errors;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::StudentResponse;
use crate::routes::students::common::UpdateStudentRequest;
use crate::state::AppState;
use db::models::student::Model as StudentModel;

/// PUT /students/{student_id}
///
/// Updates the editable roster fields for a student. Admin-only access.
///
/// ### Responses
/// - `200 OK`: updated roster entry
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: unknown student
/// - `409 Conflict`: student email already taken
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    match StudentModel::update_details(
        state.db(),
        student_id,
        &req.full_name,
        &req.class_name,
        &req.student_email,
        &req.parent_email,
    )
    .await
    {
        Ok(Some(student)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                student.into(),
                "Student details updated successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found.")),
        ),
        Err(e) => {
            if e.to_string().contains("UNIQUE constraint failed") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A student with this email already exists",
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

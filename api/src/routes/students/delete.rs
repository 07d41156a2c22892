use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use crate::state::AppState;
use db::models::student::Model as StudentModel;

/// DELETE /students/{student_id}
///
/// Removes a student from the roster; their attendance events cascade
/// away with them. Admin-only access.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`: unknown student
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match StudentModel::delete_by_id(state.db(), student_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Student deleted successfully.")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found.")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

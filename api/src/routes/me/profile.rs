use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::StudentResponse;
use crate::state::AppState;
use db::models::student::Model as StudentModel;

/// GET /me
///
/// The logged-in student's own roster entry, for the dashboard greeting.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`: session email no longer on the roster
pub async fn get_me(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    match StudentModel::find_by_student_email(state.db(), &claims.sub).await {
        Ok(Some(student)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                student.into(),
                "Profile retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(
                "No student record found for this account.",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

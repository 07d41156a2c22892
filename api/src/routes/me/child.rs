use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{EventResponse, StudentResponse};
use crate::state::AppState;
use db::models::attendance_event::{Model as EventModel, Status};
use db::models::student::Model as StudentModel;

#[derive(Debug, Serialize, Default)]
pub struct ChildStatusResponse {
    pub student: StudentResponse,
    /// Shown verbatim on the parent dashboard: the check-out reason,
    /// "HOSTEL" when checked in, "OUT" when checked out with no reason.
    pub current_status: String,
    pub records: Vec<EventResponse>,
}

/// GET /me/child
///
/// Resolves the logged-in parent to their child and returns the child's
/// derived status and event history. Event-log read failures degrade to an
/// empty history; a parent with no roster match is a terminal 404 for this
/// request.
pub async fn get_child(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<ChildStatusResponse>>) {
    let db = state.db();

    let student = match StudentModel::find_by_parent_email(db, &claims.sub).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("No student found for this parent.")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let records = EventModel::history_for_student(db, student.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, student_id = student.id, "Failed to load event history");
            Vec::new()
        });
    let status = Status::from_latest(records.last());

    let response = ChildStatusResponse {
        current_status: status.label(),
        student: student.into(),
        records: records.into_iter().map(EventResponse::from).collect(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            response,
            "Child status retrieved successfully",
        )),
    )
}

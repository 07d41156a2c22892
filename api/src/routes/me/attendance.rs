use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::EventResponse;
use crate::state::AppState;
use db::models::attendance_event::{AttendanceError, Model as EventModel, Status};
use db::models::student::Model as StudentModel;

#[derive(Debug, Deserialize)]
pub struct CheckOutRequest {
    pub reason: Option<String>,
    /// Free-text reason, substituted when `reason` is the sentinel "Other".
    pub other_reason: Option<String>,
    pub expected_return: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceSummaryResponse {
    pub status: Status,
    /// Display label for the current state (reason, "HOSTEL", or "OUT").
    pub label: String,
    pub records: Vec<EventResponse>,
}

/// Resolves the session email to a roster entry, or renders the terminal
/// per-request failure.
async fn resolve_student(state: &AppState, email: &str) -> Result<StudentModel, Response> {
    match StudentModel::find_by_student_email(state.db(), email).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                "No student record found for this account.",
            )),
        )
            .into_response()),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response()),
    }
}

/// GET /me/attendance
///
/// The student's derived status plus their full event history. Event-log
/// read failures degrade to an empty history rather than failing the
/// dashboard.
pub async fn get_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    let student = match resolve_student(&state, &claims.sub).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let db = state.db();

    let records = EventModel::history_for_student(db, student.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, student_id = student.id, "Failed to load event history");
            Vec::new()
        });
    let status = Status::from_latest(records.last());

    let summary = AttendanceSummaryResponse {
        label: status.label(),
        status,
        records: records.into_iter().map(EventResponse::from).collect(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            summary,
            "Attendance retrieved successfully",
        )),
    )
        .into_response()
}

/// POST /me/attendance/check-in
///
/// Appends a check-in event for the logged-in student.
///
/// ### Responses
/// - `200 OK`: event recorded
/// - `404 Not Found`: session email no longer on the roster
/// - `409 Conflict`: already checked in
pub async fn check_in(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    let student = match resolve_student(&state, &claims.sub).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    // Hold the per-student gate lock across the derive-and-append step.
    let _gate = state.gate_locks().acquire(student.id).await;

    match EventModel::check_in(state.db(), student.id).await {
        Ok(event) => {
            let recorded = event.recorded_at.format("%Y-%m-%d %H:%M:%S");
            let message = format!("Checked IN successfully at {recorded}.");
            (
                StatusCode::OK,
                Json(ApiResponse::success(EventResponse::from(event), message)),
            )
                .into_response()
        }
        Err(e @ AttendanceError::AlreadyCheckedIn) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
        Err(AttendanceError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}

/// POST /me/attendance/check-out
///
/// Appends a check-out event with a reason and an expected return time.
///
/// ### Responses
/// - `200 OK`: event recorded
/// - `400 Bad Request`: missing expected return time
/// - `404 Not Found`: session email no longer on the roster
/// - `409 Conflict`: already checked out
pub async fn check_out(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CheckOutRequest>,
) -> Response {
    let student = match resolve_student(&state, &claims.sub).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let _gate = state.gate_locks().acquire(student.id).await;

    match EventModel::check_out(
        state.db(),
        student.id,
        req.reason.as_deref(),
        req.other_reason.as_deref(),
        req.expected_return.as_deref(),
    )
    .await
    {
        Ok(event) => {
            let recorded = event.recorded_at.format("%Y-%m-%d %H:%M:%S");
            let message = format!("Checked OUT successfully at {recorded}.");
            (
                StatusCode::OK,
                Json(ApiResponse::success(EventResponse::from(event), message)),
            )
                .into_response()
        }
        Err(e @ AttendanceError::AlreadyCheckedOut) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
        Err(e @ AttendanceError::MissingExpectedReturn) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
        Err(AttendanceError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}

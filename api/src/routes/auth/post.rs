use axum::{Json, extract::State, http::StatusCode};
use common::{config, format_validation_errors};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::otp::OtpError;
use crate::auth::{Role, generate_jwt};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Please enter the admin username."))]
    pub username: String,

    #[validate(length(min = 1, message = "Please enter the admin password."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RequestOtpRequest {
    pub role: Role,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    pub role: Role,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please enter the OTP."))]
    pub code: String,
}

#[derive(Debug, Serialize, Default)]
pub struct PendingLoginResponse {
    pub role: String,
    pub email: String,
}

#[derive(Debug, Serialize, Default)]
pub struct AuthTokenResponse {
    pub role: String,
    pub email: String,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Authenticate the administrator against the configured credential pair
/// and issue a JWT.
///
/// ### Responses
/// - `200 OK`: token issued
/// - `400 Bad Request`: missing username or password
/// - `401 Unauthorized`: credential mismatch
pub async fn admin_login(
    Json(req): Json<AdminLoginRequest>,
) -> (StatusCode, Json<ApiResponse<AuthTokenResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let expected_username = config::admin_username();
    let expected_password = config::admin_password();

    // Unconfigured credentials never match anything.
    let configured = !expected_username.is_empty() && !expected_password.is_empty();
    if !configured || req.username != expected_username || req.password != expected_password {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(
                "Invalid admin credentials. Please try again.",
            )),
        );
    }

    let (token, expires_at) = generate_jwt(&req.username, Role::Admin);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AuthTokenResponse {
                role: Role::Admin.as_str().to_owned(),
                email: req.username,
                token,
                expires_at,
            },
            "Login successful! Welcome, Admin.",
        )),
    )
}

/// POST /auth/request-otp
///
/// Validate the (role, email) pair against the roster, generate a 4-digit
/// OTP, and email it. A repeated request replaces the pending code.
///
/// ### Responses
/// - `200 OK`: OTP stored and dispatched (mail failures are logged, not
///   surfaced)
/// - `400 Bad Request`: malformed email
/// - `401 Unauthorized`: email not on the roster for that role
/// - `500 Internal Server Error`: roster unavailable
pub async fn request_otp(
    State(state): State<AppState>,
    Json(req): Json<RequestOtpRequest>,
) -> (StatusCode, Json<ApiResponse<PendingLoginResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    match state.authenticator().request_otp(req.role, &req.email).await {
        Ok(pending) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PendingLoginResponse {
                    role: pending.role.as_str().to_owned(),
                    email: pending.email,
                },
                "OTP sent to your email. Please check your inbox.",
            )),
        ),
        Err(e @ OtpError::UnknownIdentity(_)) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ OtpError::Roster(_)) => {
            tracing::error!(error = %e, "Roster lookup failed during OTP request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// POST /auth/verify-otp
///
/// Check the submitted code against the pending one for the (role, email)
/// pair. Matching codes are single-use; a session token is returned.
///
/// ### Responses
/// - `200 OK`: token issued
/// - `400 Bad Request`: missing code
/// - `401 Unauthorized`: no pending login, incorrect code, or expired code
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> (StatusCode, Json<ApiResponse<AuthTokenResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    match state.authenticator().verify_otp(req.role, &req.email, &req.code) {
        Ok(()) => {
            let (token, expires_at) = generate_jwt(&req.email, req.role);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    AuthTokenResponse {
                        role: req.role.as_str().to_owned(),
                        email: req.email,
                        token,
                        expires_at,
                    },
                    "OTP verified successfully! Redirecting...",
                )),
            )
        }
        Err(e @ OtpError::Roster(_)) => {
            tracing::error!(error = %e, "Roster lookup failed during OTP verify");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group. All of them are public: they are
//! how a session token is obtained in the first place.
//!
//! - `POST /auth/login` → `admin_login` (environment-configured credentials)
//! - `POST /auth/request-otp` → `request_otp`
//! - `POST /auth/verify-otp` → `verify_otp`

pub mod post;

use crate::state::AppState;
use axum::{Router, routing::post};

use post::{admin_login, request_otp, verify_otp};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin_login))
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
}

//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Login endpoints (admin credentials, OTP request/verify, public)
//! - `/students` → Roster management and attendance exports (admin-only)
//! - `/me` → Role-specific dashboards (student check-in/out, parent child view)

use crate::auth::guards::allow_admin;
use crate::routes::{
    auth::auth_routes, health::health_routes, me::me_routes, students::students_routes,
};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod auth;
pub mod common;
pub mod health;
pub mod me;
pub mod students;

/// Builds the complete application router for all HTTP endpoints.
///
/// Access control is layered per group: `/students` requires an admin
/// session, `/me` routes carry their own per-role guards, and `/health`
/// plus `/auth` are public.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/students",
            students_routes().route_layer(from_fn(allow_admin)),
        )
        .nest("/me", me_routes())
        .with_state(app_state)
}

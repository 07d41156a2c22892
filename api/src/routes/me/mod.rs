//! # Me Routes Module
//!
//! Role-specific dashboards under `/me`. Guards are attached per route:
//! the student endpoints require a student session, the child view a
//! parent session.
//!
//! - `GET /me` → `get_me` (student)
//! - `GET /me/attendance` → `get_attendance` (student)
//! - `POST /me/attendance/check-in` → `check_in` (student)
//! - `POST /me/attendance/check-out` → `check_out` (student)
//! - `GET /me/child` → `get_child` (parent)

pub mod attendance;
pub mod child;
pub mod profile;

use crate::auth::guards::{allow_parent, allow_student};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

use attendance::{check_in, check_out, get_attendance};
use child::get_child;
use profile::get_me;

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_me).route_layer(from_fn(allow_student)))
        .route(
            "/attendance",
            get(get_attendance).route_layer(from_fn(allow_student)),
        )
        .route(
            "/attendance/check-in",
            post(check_in).route_layer(from_fn(allow_student)),
        )
        .route(
            "/attendance/check-out",
            post(check_out).route_layer(from_fn(allow_student)),
        )
        .route("/child", get(get_child).route_layer(from_fn(allow_parent)))
}

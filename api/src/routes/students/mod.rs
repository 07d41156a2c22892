//! # Students Routes Module
//!
//! Roster management for the `/students` endpoint group. Every route here
//! is wrapped by the `allow_admin` guard in the parent router.
//!
//! - `GET /students` → `list_students`
//! - `POST /students` → `create_student`
//! - `GET /students/export` → `export_students_csv`
//! - `GET /students/{student_id}` → `get_student`
//! - `PUT /students/{student_id}` → `update_student`
//! - `DELETE /students/{student_id}` → `delete_student`
//! - `GET /students/{student_id}/attendance` → `list_student_attendance`
//! - `GET /students/{student_id}/attendance/export` → `export_student_attendance_csv`

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use delete::delete_student;
use get::{
    export_student_attendance_csv, export_students_csv, get_student, list_student_attendance,
    list_students,
};
use post::create_student;
use put::update_student;

pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/", post(create_student))
        .route("/export", get(export_students_csv))
        .route("/{student_id}", get(get_student))
        .route("/{student_id}", put(update_student))
        .route("/{student_id}", delete(delete_student))
        .route("/{student_id}/attendance", get(list_student_attendance))
        .route(
            "/{student_id}/attendance/export",
            get(export_student_attendance_csv),
        )
}

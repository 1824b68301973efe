use crate::state::AppState;
use axum::{Router, routing::post};

pub mod post;

/// Builds the `/attendance` route group (student-only).
pub fn attendance_routes() -> Router<AppState> {
    Router::new().route("/mark", post(post::mark_attendance))
}

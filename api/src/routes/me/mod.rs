use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

/// Builds the `/me` route group (student only).
pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(get::my_attendance))
        .route("/timetable/today", get(get::my_timetable_today))
}

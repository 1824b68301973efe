use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::timetable_slot::Model as Slot;

/// GET /timetable
///
/// All slots, ordered by (day, start time) for the weekly overview.
pub async fn list_slots(State(state): State<AppState>) -> impl IntoResponse {
    match Slot::list_ordered(state.db()).await {
        Ok(slots) => (
            StatusCode::OK,
            Json(ApiResponse::success(slots, "Timetable retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

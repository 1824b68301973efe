use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;

use crate::response::{ApiResponse, Empty};
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::timetable_slot;

/// DELETE /timetable/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> impl IntoResponse {
    match timetable_slot::Entity::delete_by_id(slot_id)
        .exec(state.db())
        .await
    {
        Ok(res) if res.rows_affected == 0 => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Timetable slot not found")),
        ),
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Timetable slot deleted")),
        ),
        Err(e) => db_error(e),
    }
}

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
use db::models::user::{self, Model as User};

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match user::Entity::delete_by_id(user_id).exec(state.db()).await {
        Ok(res) if res.rows_affected == 0 => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("User not found")),
        ),
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "User deleted successfully")),
        ),
        Err(e) => db_error(e),
    }
}

/// DELETE /users/{user_id}/device
///
/// Clears the device fingerprint so the student can enrol a new phone
/// at their next login.
pub async fn reset_device_lock(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match User::get_by_id(state.db(), user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("User not found")),
            );
        }
        Err(e) => return db_error(e),
    }

    match User::clear_device(state.db(), user_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Device lock cleared")),
        ),
        Err(e) => db_error(e),
    }
}

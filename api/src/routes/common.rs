//! Helpers shared by route handlers.

use crate::response::ApiResponse;
use axum::{Json, http::StatusCode};
use sea_orm::DbErr;
use serde::Serialize;

/// True when the error is a unique-index violation, which handlers
/// surface as `409 Conflict` rather than a server error.
pub fn is_unique_violation(err: &DbErr) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

/// Standard `500` for unexpected database failures.
pub fn db_error<T>(err: DbErr) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    tracing::error!("database error: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(format!("Database error: {err}"))),
    )
}

/// Normalizes pagination query params: pages are 1-based, page size is
/// clamped to 100.
pub fn page_bounds(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    (page.unwrap_or(1).max(1), per_page.unwrap_or(20).clamp(1, 100))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::{attendance_record, lecture::Model as Lecture};

/// GET /lectures/active
///
/// The caller's currently running lectures, newest first.
pub async fn active_lectures(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    match Lecture::find_active_for_teacher(state.db(), claims.sub).await {
        Ok(lectures) => (
            StatusCode::OK,
            Json(ApiResponse::success(lectures, "Active lectures retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /lectures/{lecture_id}/records
///
/// Attendance rows for one lecture, in scan order.
pub async fn lecture_records(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
) -> impl IntoResponse {
    match Lecture::get_by_id(state.db(), lecture_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<attendance_record::Model>>::error(
                    "Lecture not found",
                )),
            );
        }
        Err(e) => return db_error(e),
    }

    match attendance_record::Model::list_for_lecture(state.db(), lecture_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(records, "Attendance records retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

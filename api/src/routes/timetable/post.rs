use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveTime;
use serde::Deserialize;
use validator::Validate;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{db_error, is_unique_violation};
use crate::state::AppState;
use common::format_validation_errors;
use db::models::timetable_slot::{self, Model as Slot};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlotRequest {
    #[validate(range(min = 0, max = 6, message = "day_of_week must be 0 (Monday) to 6 (Sunday)"))]
    pub day_of_week: i32,

    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    pub end_time: String,

    pub course_id: i64,
    pub classroom_id: i64,

    #[validate(length(min = 1, message = "Division is required"))]
    pub division: String,
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// POST /timetable
///
/// Creates a weekly slot. The caller is recorded as the slot's teacher.
///
/// ### Responses
/// - `201 Created` with the slot
/// - `400 Bad Request` (validation failure, unparseable times, or
///   end before start)
/// - `409 Conflict` (another slot already starts at that time in the
///   same classroom on the same day)
pub async fn create_slot(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateSlotRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<timetable_slot::Model>>::error(
                format_validation_errors(&validation_errors),
            )),
        );
    }

    let (Some(start_time), Some(end_time)) = (parse_time(&req.start_time), parse_time(&req.end_time))
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Invalid time format, expected HH:MM")),
        );
    };
    if end_time < start_time {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("end_time must not precede start_time")),
        );
    }

    match Slot::create(
        state.db(),
        req.day_of_week,
        start_time,
        end_time,
        req.course_id,
        req.classroom_id,
        claims.sub,
        &req.division,
    )
    .await
    {
        Ok(slot) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(slot), "Timetable slot created")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(
                "A slot already exists for this classroom at that day and time",
            )),
        ),
        Err(e) => db_error(e),
    }
}

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Datelike, Local, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{db_error, page_bounds};
use crate::state::AppState;
use db::models::{
    attendance_record::{self, Status},
    course, lecture, student_profile, timetable_slot,
};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceHistoryRow {
    pub lecture_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub status: Status,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceHistoryResponse {
    pub records: Vec<AttendanceHistoryRow>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /me/attendance
///
/// The caller's attendance history, newest first, with the course each
/// lecture belonged to.
pub async fn my_attendance(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let (page, per_page) = page_bounds(params.page, params.per_page);

    let paginator = attendance_record::Entity::find()
        .filter(attendance_record::Column::StudentId.eq(claims.sub))
        .find_also_related(lecture::Entity)
        .order_by_desc(attendance_record::Column::RecordedAt)
        .paginate(state.db(), per_page);

    let total = match paginator.num_items().await {
        Ok(total) => total,
        Err(e) => return db_error(e),
    };
    let rows = match paginator.fetch_page(page - 1).await {
        Ok(rows) => rows,
        Err(e) => return db_error(e),
    };

    // One lookup for all the courses on this page.
    let course_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, l)| l.as_ref().map(|l| l.course_id))
        .collect();
    let courses: HashMap<i64, course::Model> = match course::Entity::find()
        .filter(course::Column::Id.is_in(course_ids))
        .all(state.db())
        .await
    {
        Ok(courses) => courses.into_iter().map(|c| (c.id, c)).collect(),
        Err(e) => return db_error(e),
    };

    let records = rows
        .into_iter()
        .map(|(record, lecture)| {
            let course = lecture
                .as_ref()
                .and_then(|l| courses.get(&l.course_id));
            AttendanceHistoryRow {
                lecture_id: record.lecture_id,
                course_code: course.map(|c| c.code.clone()).unwrap_or_default(),
                course_name: course.map(|c| c.name.clone()).unwrap_or_default(),
                status: record.status,
                recorded_at: record.recorded_at,
            }
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AttendanceHistoryResponse {
                records,
                page,
                per_page,
                total,
            },
            "Attendance history retrieved",
        )),
    )
}

/// GET /me/timetable/today
///
/// Today's slots for the calling student's division, ordered by start
/// time. Requires a student profile.
pub async fn my_timetable_today(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    let profile = match student_profile::Model::get_by_user_id(state.db(), claims.sub).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<timetable_slot::Model>>::error(
                    "Student profile not found",
                )),
            );
        }
        Err(e) => return db_error(e),
    };

    let day_of_week = Local::now().weekday().num_days_from_monday() as i32;
    match timetable_slot::Model::list_for_day_and_division(state.db(), day_of_week, &profile.division)
        .await
    {
        Ok(slots) => (
            StatusCode::OK,
            Json(ApiResponse::success(slots, "Today's timetable retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::{
    attendance_record::{self, Status},
    lecture::{self, Model as Lecture},
};

#[derive(Debug, Deserialize)]
pub struct StartLectureRequest {
    pub course_id: i64,
    pub classroom_id: i64,
}

/// POST /lectures
///
/// Manually starts a lecture in a classroom with the caller as its
/// teacher. The returned `session_token` is what students submit from
/// their phones to mark themselves present.
///
/// ### Responses
/// - `201 Created` with the lecture
/// - `409 Conflict` when the classroom already has an active lecture
pub async fn start_lecture(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<StartLectureRequest>,
) -> impl IntoResponse {
    match Lecture::find_active_for_classroom(state.db(), req.classroom_id).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<Option<lecture::Model>>::error(
                    "This classroom already has an active lecture",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    match Lecture::start(state.db(), req.course_id, req.classroom_id, claims.sub).await {
        Ok(lecture) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(lecture), "Lecture started")),
        ),
        Err(e) => db_error(e),
    }
}

/// POST /lectures/{lecture_id}/end
///
/// Deactivates the lecture and stamps its end time.
pub async fn end_lecture(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
) -> impl IntoResponse {
    let lecture = match Lecture::get_by_id(state.db(), lecture_id).await {
        Ok(Some(lecture)) => lecture,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Option<lecture::Model>>::error("Lecture not found")),
            );
        }
        Err(e) => return db_error(e),
    };

    if !lecture.is_active {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Lecture has already ended")),
        );
    }

    match Lecture::end(state.db(), lecture_id).await {
        Ok(lecture) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(lecture), "Lecture ended")),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct OverrideRecordRequest {
    pub student_id: i64,
    pub status: Status,
}

/// POST /lectures/{lecture_id}/records
///
/// Manual correction by the teacher. Upserts on the (student, lecture)
/// key: an existing record has its status replaced rather than
/// duplicated, and the row is flagged as a manual override.
pub async fn override_record(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
    Json(req): Json<OverrideRecordRequest>,
) -> impl IntoResponse {
    match Lecture::get_by_id(state.db(), lecture_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Option<attendance_record::Model>>::error(
                    "Lecture not found",
                )),
            );
        }
        Err(e) => return db_error(e),
    }

    match attendance_record::Model::override_mark(state.db(), req.student_id, lecture_id, req.status)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(record), "Attendance record updated")),
        ),
        Err(e) => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::{StartLectureRequest, end_lecture, start_lecture};
    use crate::auth::claims::{AuthUser, Claims};
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::{Path, State};
    use axum::response::IntoResponse;
    use axum::{Json, http::StatusCode};
    use db::models::{classroom, course, department, semester, user};
    use db::test_utils::setup_test_db;
    use serde_json::Value;

    async fn seed(state: &AppState) -> (i64, i64, AuthUser) {
        let dept = department::Model::create(state.db(), "Chemistry", "CH").await.unwrap();
        let sem = semester::Model::create(state.db(), 2, true).await.unwrap();
        let course = course::Model::create(state.db(), "Organic Chemistry", "CH201", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(state.db(), "Lab-2", 30, None).await.unwrap();
        let teacher = user::Model::create(
            state.db(),
            "t-lab2",
            "tlab2@example.edu",
            "pw",
            user::Role::Teacher,
            "Farai",
            "Chirwa",
        )
        .await
        .unwrap();
        let auth = AuthUser(Claims {
            sub: teacher.id,
            role: user::Role::Teacher,
            exp: 0,
        });
        (course.id, room.id, auth)
    }

    #[tokio::test]
    async fn busy_classroom_refuses_second_lecture() {
        let state = AppState::new(setup_test_db().await);
        let (course_id, room_id, auth) = seed(&state).await;

        let response = start_lecture(
            State(state.clone()),
            auth.clone(),
            Json(StartLectureRequest {
                course_id,
                classroom_id: room_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        let lecture_id = json["data"]["id"].as_i64().unwrap();
        assert!(json["data"]["session_token"].as_str().unwrap().len() > 10);

        let response = start_lecture(
            State(state.clone()),
            auth.clone(),
            Json(StartLectureRequest {
                course_id,
                classroom_id: room_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Once ended, the room frees up.
        let response = end_lecture(State(state.clone()), Path(lecture_id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = start_lecture(
            State(state),
            auth,
            Json(StartLectureRequest {
                course_id,
                classroom_id: room_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn ending_twice_is_a_conflict() {
        let state = AppState::new(setup_test_db().await);
        let (course_id, room_id, auth) = seed(&state).await;

        let response = start_lecture(
            State(state.clone()),
            auth,
            Json(StartLectureRequest {
                course_id,
                classroom_id: room_id,
            }),
        )
        .await
        .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        let lecture_id = json["data"]["id"].as_i64().unwrap();

        end_lecture(State(state.clone()), Path(lecture_id)).await;
        let response = end_lecture(State(state), Path(lecture_id)).await.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

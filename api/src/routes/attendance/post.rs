use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::DbErr;
use serde::Deserialize;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::{attendance_record, lecture::Model as Lecture};

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    /// Token shown by the teacher for the running lecture.
    pub session_token: String,
}

/// POST /attendance/mark
///
/// Marks the calling student present for the lecture behind the
/// submitted session token.
///
/// ### Responses
/// - `201 Created` with the record
/// - `404 Not Found` (unknown token)
/// - `409 Conflict` (lecture has ended)
/// - `400 Bad Request` (already recorded)
pub async fn mark_attendance(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<MarkAttendanceRequest>,
) -> impl IntoResponse {
    let lecture = match Lecture::find_by_session_token(state.db(), &req.session_token).await {
        Ok(Some(lecture)) => lecture,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Option<attendance_record::Model>>::error(
                    "Invalid session token",
                )),
            );
        }
        Err(e) => return db_error(e),
    };

    if !lecture.is_active {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("This lecture has already ended")),
        );
    }

    match attendance_record::Model::mark_mobile(state.db(), claims.sub, lecture.id).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(record), "Attendance recorded")),
        ),
        Err(DbErr::Custom(msg)) => (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        Err(e) => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkAttendanceRequest, mark_attendance};
    use crate::auth::claims::{AuthUser, Claims};
    use crate::state::AppState;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum::{Json, http::StatusCode};
    use db::models::{classroom, course, department, lecture, semester, user};
    use db::test_utils::setup_test_db;

    async fn seed(state: &AppState) -> (lecture::Model, AuthUser) {
        let dept = department::Model::create(state.db(), "Civil", "CE").await.unwrap();
        let sem = semester::Model::create(state.db(), 5, true).await.unwrap();
        let course = course::Model::create(state.db(), "Surveying", "CE502", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(state.db(), "110", 70, None).await.unwrap();
        let teacher = user::Model::create(
            state.db(),
            "t-110",
            "t110@example.edu",
            "pw",
            user::Role::Teacher,
            "Vusi",
            "Ndlovu",
        )
        .await
        .unwrap();
        let student = user::Model::create(
            state.db(),
            "2526B080",
            "2526b080@example.edu",
            "pw",
            user::Role::Student,
            "Zanele",
            "Sithole",
        )
        .await
        .unwrap();
        let lecture = lecture::Model::start(state.db(), course.id, room.id, teacher.id)
            .await
            .unwrap();
        let auth = AuthUser(Claims {
            sub: student.id,
            role: user::Role::Student,
            exp: 0,
        });
        (lecture, auth)
    }

    #[tokio::test]
    async fn mark_then_duplicate_then_ended() {
        let state = AppState::new(setup_test_db().await);
        let (lecture, auth) = seed(&state).await;
        let req = || {
            Json(MarkAttendanceRequest {
                session_token: lecture.session_token.clone(),
            })
        };

        let response = mark_attendance(State(state.clone()), auth.clone(), req())
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = mark_attendance(State(state.clone()), auth.clone(), req())
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        db::models::lecture::Model::end(state.db(), lecture.id)
            .await
            .unwrap();
        let response = mark_attendance(State(state), auth, req()).await.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let state = AppState::new(setup_test_db().await);
        let (_, auth) = seed(&state).await;

        let response = mark_attendance(
            State(state),
            auth,
            Json(MarkAttendanceRequest {
                session_token: "not-a-token".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

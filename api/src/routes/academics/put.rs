use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::EntityTrait;
use serde::Deserialize;

use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::{classroom, semester};

/// PUT /semesters/{semester_id}/activate
///
/// Marks one semester as the active term; every other semester is
/// deactivated in the same call.
pub async fn activate_semester(
    State(state): State<AppState>,
    Path(semester_id): Path<i64>,
) -> impl IntoResponse {
    match semester::Entity::find_by_id(semester_id).one(state.db()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Option<semester::Model>>::error("Semester not found")),
            );
        }
        Err(e) => return db_error(e),
    }

    match semester::Model::activate(state.db(), semester_id).await {
        Ok(sem) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(sem), "Semester activated")),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct BindDeviceRequest {
    pub device_id: String,
}

/// PUT /classrooms/{classroom_id}/device
///
/// Assigns (or replaces) the scanner device mounted in a room. A device
/// id can only ever belong to one room.
pub async fn bind_classroom_device(
    State(state): State<AppState>,
    Path(classroom_id): Path<i64>,
    Json(req): Json<BindDeviceRequest>,
) -> impl IntoResponse {
    if req.device_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<classroom::Model>>::error("device_id is required")),
        );
    }

    match classroom::Model::get_by_device_id(state.db(), &req.device_id).await {
        Ok(Some(other)) if other.id != classroom_id => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(format!(
                    "Device {} is already bound to room {}",
                    req.device_id, other.room_number
                ))),
            );
        }
        Ok(_) => {}
        Err(e) => return db_error(e),
    }

    match classroom::Entity::find_by_id(classroom_id).one(state.db()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Classroom not found")),
            );
        }
        Err(e) => return db_error(e),
    }

    match classroom::Model::bind_device(state.db(), classroom_id, &req.device_id).await {
        Ok(room) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(room), "Device bound to classroom")),
        ),
        Err(e) => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::{BindDeviceRequest, activate_semester, bind_classroom_device};
    use crate::state::AppState;
    use axum::extract::{Path, State};
    use axum::response::IntoResponse;
    use axum::{Json, http::StatusCode};
    use db::models::{classroom, semester};
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn activate_switches_the_active_semester() {
        let state = AppState::new(setup_test_db().await);
        let first = semester::Model::create(state.db(), 1, true).await.unwrap();
        let second = semester::Model::create(state.db(), 2, false).await.unwrap();

        let response = activate_semester(State(state.clone()), Path(second.id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let active = semester::Model::current_active(state.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.id, second.id);
        assert_ne!(active.id, first.id);
    }

    #[tokio::test]
    async fn device_cannot_be_bound_to_two_rooms() {
        let state = AppState::new(setup_test_db().await);
        let room_a = classroom::Model::create(state.db(), "A1", 40, Some("ESP_ROOM_A1"))
            .await
            .unwrap();
        let room_b = classroom::Model::create(state.db(), "B1", 40, None).await.unwrap();

        let response = bind_classroom_device(
            State(state.clone()),
            Path(room_b.id),
            Json(BindDeviceRequest {
                device_id: "ESP_ROOM_A1".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Re-binding the same device to its own room is fine.
        let response = bind_classroom_device(
            State(state),
            Path(room_a.id),
            Json(BindDeviceRequest {
                device_id: "ESP_ROOM_A1".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

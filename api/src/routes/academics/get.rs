use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::{EntityTrait, QueryOrder};

use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use db::models::{batch, classroom, course, department, semester};

/// GET /departments
pub async fn list_departments(State(state): State<AppState>) -> impl IntoResponse {
    match department::Entity::find()
        .order_by_asc(department::Column::Name)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Departments retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /batches
pub async fn list_batches(State(state): State<AppState>) -> impl IntoResponse {
    match batch::Entity::find()
        .order_by_asc(batch::Column::Year)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Batches retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /semesters
pub async fn list_semesters(State(state): State<AppState>) -> impl IntoResponse {
    match semester::Entity::find()
        .order_by_asc(semester::Column::Number)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Semesters retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /classrooms
pub async fn list_classrooms(State(state): State<AppState>) -> impl IntoResponse {
    match classroom::Entity::find()
        .order_by_asc(classroom::Column::RoomNumber)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Classrooms retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /courses
pub async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    match course::Entity::find()
        .order_by_asc(course::Column::Code)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Courses retrieved")),
        ),
        Err(e) => db_error(e),
    }
}

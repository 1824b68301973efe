use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::response::ApiResponse;
use crate::routes::common::{db_error, is_unique_violation};
use crate::state::AppState;
use db::models::{batch, classroom, course, department, semester};

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub code: String,
}

/// POST /departments
pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> impl IntoResponse {
    match department::Model::create(state.db(), &req.name, &req.code).await {
        Ok(dept) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(dept), "Department created")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A department with this code already exists")),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    pub year: i32,
    pub department_id: i64,
}

/// POST /batches
pub async fn create_batch(
    State(state): State<AppState>,
    Json(req): Json<CreateBatchRequest>,
) -> impl IntoResponse {
    match batch::Model::create(state.db(), req.year, req.department_id).await {
        Ok(batch) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(batch), "Batch created")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(
                "This department already has a batch for that year",
            )),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSemesterRequest {
    pub number: i32,
    /// New semesters default to inactive; use the activate endpoint to
    /// switch terms.
    #[serde(default)]
    pub is_active: bool,
}

/// POST /semesters
pub async fn create_semester(
    State(state): State<AppState>,
    Json(req): Json<CreateSemesterRequest>,
) -> impl IntoResponse {
    match semester::Model::create(state.db(), req.number, req.is_active).await {
        Ok(sem) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(sem), "Semester created")),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateClassroomRequest {
    pub room_number: String,
    pub capacity: i32,
    pub esp_device_id: Option<String>,
}

/// POST /classrooms
pub async fn create_classroom(
    State(state): State<AppState>,
    Json(req): Json<CreateClassroomRequest>,
) -> impl IntoResponse {
    match classroom::Model::create(
        state.db(),
        &req.room_number,
        req.capacity,
        req.esp_device_id.as_deref(),
    )
    .await
    {
        Ok(room) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(room), "Classroom created")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(
                "A classroom with this room number or device already exists",
            )),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    pub code: String,
    pub department_id: i64,
    pub semester_id: i64,
}

/// POST /courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    match course::Model::create(
        state.db(),
        &req.name,
        &req.code,
        req.department_id,
        req.semester_id,
    )
    .await
    {
        Ok(course) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(course), "Course created")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A course with this code already exists")),
        ),
        Err(e) => db_error(e),
    }
}

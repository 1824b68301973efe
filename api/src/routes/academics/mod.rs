use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub mod get;
pub mod post;
pub mod put;

/// Builds the academic reference data routes (admin-only). These are
/// mounted at the API root, so the paths here are the full ones.
pub fn academics_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/departments",
            get(get::list_departments).post(post::create_department),
        )
        .route("/batches", get(get::list_batches).post(post::create_batch))
        .route(
            "/semesters",
            get(get::list_semesters).post(post::create_semester),
        )
        .route("/semesters/{semester_id}/activate", put(put::activate_semester))
        .route(
            "/classrooms",
            get(get::list_classrooms).post(post::create_classroom),
        )
        .route("/classrooms/{classroom_id}/device", put(put::bind_classroom_device))
        .route("/courses", get(get::list_courses).post(post::create_course))
}

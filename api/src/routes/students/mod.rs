use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod get;
pub mod post;

/// Builds the `/students` route group (teacher or admin).
pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_students))
        .route("/bulk", post(post::bulk_register))
}

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod get;
pub mod post;

/// Builds the `/lectures` route group (teacher or admin).
pub fn lectures_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::start_lecture))
        .route("/active", get(get::active_lectures))
        .route("/{lecture_id}/end", post(post::end_lecture))
        .route(
            "/{lecture_id}/records",
            get(get::lecture_records).post(post::override_record),
        )
}

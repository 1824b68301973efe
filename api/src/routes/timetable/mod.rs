use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

pub mod delete;
pub mod get;
pub mod post;

/// Builds the `/timetable` route group (teacher or admin).
pub fn timetable_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_slots).post(post::create_slot))
        .route("/{slot_id}", delete(delete::delete_slot))
}

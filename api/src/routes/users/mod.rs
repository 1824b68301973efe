use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, put},
};

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/users` route group (admin-only; the guard is applied
/// where the group is mounted).
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_users).post(post::create_user))
        .route("/{user_id}", put(put::edit_user).delete(delete::delete_user))
        .route("/{user_id}/device", delete(delete::reset_device_lock))
}

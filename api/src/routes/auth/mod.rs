use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{Router, middleware::from_fn, routing::post};

pub mod post;

/// Builds the `/auth` route group. Login is public; changing a password
/// requires a valid bearer token for any role.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(post::login))
        .route(
            "/change-password",
            post(post::change_password).route_layer(from_fn(allow_authenticated)),
        )
}

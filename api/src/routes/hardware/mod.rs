use crate::state::AppState;
use axum::{Router, routing::post};

pub mod post;

/// Builds the `/hardware` route group. Scanners authenticate with the
/// shared `X-ESP32-API-KEY` header instead of a JWT.
pub fn hardware_routes() -> Router<AppState> {
    Router::new().route("/scan", post(post::receive_scans))
}

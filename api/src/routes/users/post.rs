use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{db_error, is_unique_violation};
use crate::state::AppState;
use common::format_validation_errors;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// POST /users
///
/// Creates an account with an explicit role.
///
/// ### Responses
/// - `201 Created` with the user
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (username or email already taken)
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<db::models::user::Model>>::error(
                format_validation_errors(&validation_errors),
            )),
        );
    }

    match User::get_by_username(state.db(), &req.username).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("A user with this username already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    match User::create(
        state.db(),
        &req.username,
        &req.email,
        &req.password,
        req.role,
        &req.first_name,
        &req.last_name,
    )
    .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(user), "User created successfully")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A user with this email already exists")),
        ),
        Err(e) => db_error(e),
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;

use crate::response::ApiResponse;
use crate::routes::common::{db_error, is_unique_violation};
use crate::state::AppState;
use db::models::user::{self, Model as User, Role};

#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
}

/// PUT /users/{user_id}
///
/// Partial update; absent fields are left untouched.
pub async fn edit_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<EditUserRequest>,
) -> impl IntoResponse {
    match User::get_by_id(state.db(), user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Option<user::Model>>::error("User not found")),
            );
        }
        Err(e) => return db_error(e),
    }

    let mut active = user::ActiveModel {
        id: Set(user_id),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(first_name) = req.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = req.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = req.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(role) = req.role {
        active.role = Set(role);
    }

    match active.update(state.db()).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(user), "User updated successfully")),
        ),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A user with this email already exists")),
        ),
        Err(e) => db_error(e),
    }
}

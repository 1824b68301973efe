use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::claims::AuthUser;
use crate::auth::generate_jwt;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use common::format_validation_errors;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Hardware fingerprint of the phone making the request. Students
    /// are locked to the first device they log in from.
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Authenticate with username (students use their roll number) and
/// password, returning a bearer token.
///
/// ### Request Body
/// ```json
/// {
///   "username": "2526B069",
///   "password": "secret",
///   "device_id": "android-abc123"
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ id, username, role, token, expires_at }`
/// - `401 Unauthorized` on bad credentials
/// - `403 Forbidden` when a student logs in from a device other than
///   the one their account is bound to
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let user = match User::get_by_username(state.db(), &req.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Invalid username or password")),
            );
        }
        Err(e) => return crate::routes::common::db_error(e),
    };

    if !user.verify_password(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid username or password")),
        );
    }

    // Device lock applies to students only. The first device_id seen
    // binds the account; a different one is rejected until an admin
    // clears the binding.
    if user.role == Role::Student {
        if let Some(ref device_id) = req.device_id {
            match user.device_fingerprint {
                None => {
                    if let Err(e) = User::bind_device(state.db(), user.id, device_id).await {
                        return crate::routes::common::db_error(e);
                    }
                    tracing::info!(user_id = user.id, "bound account to first login device");
                }
                Some(ref bound) if bound != device_id => {
                    tracing::warn!(user_id = user.id, "login attempt from a different device");
                    return (
                        StatusCode::FORBIDDEN,
                        Json(ApiResponse::error(
                            "This account is registered to another device. Ask an admin to reset the device lock.",
                        )),
                    );
                }
                Some(_) => {}
            }
        }
    }

    let (token, expires_at) = generate_jwt(user.id, user.role);

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                id: user.id,
                username: user.username,
                role: user.role.to_string(),
                token,
                expires_at,
            },
            "Login successful",
        )),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// POST /auth/change-password
///
/// Verifies the caller's current password and replaces it.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (validation failure, or wrong current password)
/// - `401 Unauthorized` (missing or invalid token)
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let user = match User::get_by_id(state.db(), claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("User not found")),
            );
        }
        Err(e) => return crate::routes::common::db_error(e),
    };

    if !user.verify_password(&req.current_password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Current password is incorrect")),
        );
    }

    match User::set_password(state.db(), user.id, &req.new_password).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Password changed successfully")),
        ),
        Err(e) => crate::routes::common::db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangePasswordRequest, LoginRequest, change_password, login};
    use crate::auth::claims::{AuthUser, Claims};
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum::{Json, http::StatusCode};
    use common::AppConfig;
    use db::models::user::{Model as User, Role};
    use db::test_utils::setup_test_db;
    use serde_json::Value;
    use serial_test::serial;

    async fn seed_student(state: &AppState) -> User {
        User::create(
            state.db(),
            "2526B069",
            "2526b069@example.edu",
            "2526B069",
            Role::Student,
            "Asha",
            "Patel",
        )
        .await
        .unwrap()
    }

    fn login_req(username: &str, password: &str, device_id: Option<&str>) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
            device_id: device_id.map(str::to_owned),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn login_binds_first_device_and_rejects_second() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);
        let student = seed_student(&state).await;

        let response = login(
            State(state.clone()),
            Json(login_req("2526B069", "2526B069", Some("phone-one"))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["role"], "student");
        assert!(json["data"]["token"].as_str().unwrap().len() > 20);

        let bound = User::get_by_id(state.db(), student.id).await.unwrap().unwrap();
        assert_eq!(bound.device_fingerprint.as_deref(), Some("phone-one"));

        // Same credentials from a different phone.
        let response = login(
            State(state.clone()),
            Json(login_req("2526B069", "2526B069", Some("phone-two"))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The original phone still works.
        let response = login(
            State(state),
            Json(login_req("2526B069", "2526B069", Some("phone-one"))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn login_rejects_bad_credentials() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);
        seed_student(&state).await;

        let response = login(
            State(state.clone()),
            Json(login_req("2526B069", "wrong", None)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = login(State(state), Json(login_req("nobody", "pw", None)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn change_password_requires_current_password() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);
        let student = seed_student(&state).await;
        let auth = AuthUser(Claims {
            sub: student.id,
            role: Role::Student,
            exp: 0,
        });

        let response = change_password(
            State(state.clone()),
            auth.clone(),
            Json(ChangePasswordRequest {
                current_password: "wrong".into(),
                new_password: "long-enough-pw".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = change_password(
            State(state.clone()),
            auth,
            Json(ChangePasswordRequest {
                current_password: "2526B069".into(),
                new_password: "long-enough-pw".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let updated = User::get_by_id(state.db(), student.id).await.unwrap().unwrap();
        assert!(updated.verify_password("long-enough-pw"));
    }
}

//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each group protected by the
//! appropriate access-control middleware:
//! - `/health` → liveness probe (public)
//! - `/auth` → login (public) and password management (any authenticated
//!   user)
//! - `/hardware` → scanner ingestion (shared-key header, no JWT)
//! - `/users` → account administration (admin)
//! - `/departments`, `/batches`, `/semesters`, `/classrooms`,
//!   `/courses` → academic reference data (admin)
//! - `/students` → registrar endpoints (teacher or admin)
//! - `/timetable` → weekly schedule management (teacher or admin)
//! - `/lectures` → lecture lifecycle and records (teacher or admin)
//! - `/attendance` → self-service marking (student)
//! - `/me` → the caller's own attendance and schedule (student)

use crate::auth::guards::{allow_admin, allow_staff, allow_student};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod academics;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod hardware;
pub mod health;
pub mod lectures;
pub mod me;
pub mod students;
pub mod timetable;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/hardware", hardware::hardware_routes())
        .nest("/users", users::users_routes().route_layer(from_fn(allow_admin)))
        .merge(academics::academics_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/students",
            students::students_routes().route_layer(from_fn(allow_staff)),
        )
        .nest(
            "/timetable",
            timetable::timetable_routes().route_layer(from_fn(allow_staff)),
        )
        .nest(
            "/lectures",
            lectures::lectures_routes().route_layer(from_fn(allow_staff)),
        )
        .nest(
            "/attendance",
            attendance::attendance_routes().route_layer(from_fn(allow_student)),
        )
        .nest("/me", me::me_routes().route_layer(from_fn(allow_student)))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::routes;
    use crate::auth::generate_jwt;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use common::AppConfig;
    use db::models::user::{self, Role};
    use db::test_utils::setup_test_db;
    use serial_test::serial;
    use tower::ServiceExt;

    async fn get_with_token(app: axum::Router, uri: &str, token: &str) -> StatusCode {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    #[serial]
    async fn me_routes_are_student_only() {
        AppConfig::init_test_defaults();
        let db = setup_test_db().await;

        let student = user::Model::create(
            &db,
            "2526B001",
            "2526b001@students.example.edu",
            "pw",
            Role::Student,
            "Asha",
            "Pillay",
        )
        .await
        .unwrap();
        let teacher = user::Model::create(
            &db,
            "t-100",
            "t100@example.edu",
            "pw",
            Role::Teacher,
            "Noor",
            "Hassan",
        )
        .await
        .unwrap();

        let (student_token, _) = generate_jwt(student.id, Role::Student);
        let (teacher_token, _) = generate_jwt(teacher.id, Role::Teacher);

        let app = routes(AppState::new(db));
        let teacher_status =
            get_with_token(app.clone(), "/me/attendance", &teacher_token).await;
        assert_eq!(teacher_status, StatusCode::FORBIDDEN);

        let student_status = get_with_token(app, "/me/attendance", &student_token).await;
        assert_eq!(student_status, StatusCode::OK);
    }
}

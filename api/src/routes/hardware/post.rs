use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use common::AppConfig;
use db::ingest::{ScanError, ScanOutcome, ingest_scan_batch};

const API_KEY_HEADER: &str = "x-esp32-api-key";

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// The scanner's device id, as provisioned on the board.
    pub device_id: String,
    /// Roll numbers read from cards/tags since the last sync.
    pub scans: Vec<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct ScanResponse {
    /// True when no class was scheduled and the batch was dropped.
    pub ignored: bool,
    pub lecture_id: Option<i64>,
    pub class: Option<String>,
    pub marked_new: u64,
    pub total_present: u64,
    pub unknown_ids: Vec<String>,
}

/// POST /hardware/scan
///
/// Ingestion endpoint for classroom scanners.
///
/// ### Request Body
/// ```json
/// {
///   "device_id": "ESP_ROOM_101",
///   "scans": ["2526B069", "2526B070"]
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with a marking summary, or with `ignored: true` when no
///   class is scheduled in the room right now
/// - `400 Bad Request` (empty device id or scan list)
/// - `403 Forbidden` (missing or wrong `X-ESP32-API-KEY`)
/// - `404 Not Found` (device not bound to any classroom)
pub async fn receive_scans(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ScanRequest>,
) -> impl IntoResponse {
    let expected = AppConfig::global().esp32_api_key.clone();
    let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if provided != Some(expected.as_str()) {
        tracing::warn!(device_id = %req.device_id, "scan batch with bad or missing device key");
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<ScanResponse>::error("Invalid device key")),
        );
    }

    let now = Local::now().naive_local();
    match ingest_scan_batch(state.db(), &req.device_id, &req.scans, now).await {
        Ok(ScanOutcome::Marked(summary)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ScanResponse {
                    ignored: false,
                    lecture_id: Some(summary.lecture_id),
                    class: Some(summary.course_name),
                    marked_new: summary.marked_new,
                    total_present: summary.total_present,
                    unknown_ids: summary.unknown_ids,
                },
                "Attendance synced",
            )),
        ),
        Ok(ScanOutcome::NoScheduledClass) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ScanResponse {
                    ignored: true,
                    ..Default::default()
                },
                "No class scheduled right now. Scans ignored.",
            )),
        ),
        Err(e @ ScanError::EmptyBatch) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ ScanError::UnknownDevice(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(ScanError::Db(e)) => db_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::{ScanRequest, receive_scans};
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use axum::Json;
    use common::AppConfig;
    use db::models::{classroom, course, department, lecture, semester, user};
    use db::test_utils::setup_test_db;
    use serde_json::Value;
    use serial_test::serial;

    fn keyed_headers(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-esp32-api-key", HeaderValue::from_str(key).unwrap());
        headers
    }

    fn req(device_id: &str, scans: &[&str]) -> Json<ScanRequest> {
        Json(ScanRequest {
            device_id: device_id.into(),
            scans: scans.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[tokio::test]
    #[serial]
    async fn wrong_key_is_forbidden() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);

        let response = receive_scans(
            State(state.clone()),
            keyed_headers("not-the-key"),
            req("ESP_ROOM_101", &["2526B069"]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = receive_scans(
            State(state),
            HeaderMap::new(),
            req("ESP_ROOM_101", &["2526B069"]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn active_lecture_gets_marked_and_no_schedule_is_ignored() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);

        let dept = department::Model::create(state.db(), "Computer Science", "CS")
            .await
            .unwrap();
        let sem = semester::Model::create(state.db(), 3, true).await.unwrap();
        let course = course::Model::create(state.db(), "Networks", "CS307", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(state.db(), "101", 60, Some("ESP_ROOM_101"))
            .await
            .unwrap();
        let teacher = user::Model::create(
            state.db(),
            "t-101",
            "t101@example.edu",
            "pw",
            user::Role::Teacher,
            "Nadia",
            "Omar",
        )
        .await
        .unwrap();
        user::Model::create(
            state.db(),
            "2526B069",
            "2526b069@example.edu",
            "pw",
            user::Role::Student,
            "Asha",
            "Patel",
        )
        .await
        .unwrap();

        // No lecture, no timetable: the batch is dropped.
        let response = receive_scans(
            State(state.clone()),
            keyed_headers("esp-test-key"),
            req("ESP_ROOM_101", &["2526B069"]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["ignored"], true);

        // With a running lecture the same batch marks the student.
        lecture::Model::start(state.db(), course.id, room.id, teacher.id)
            .await
            .unwrap();
        let response = receive_scans(
            State(state),
            keyed_headers("esp-test-key"),
            req("ESP_ROOM_101", &["2526B069", "GHOST-1"]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["ignored"], false);
        assert_eq!(json["data"]["class"], "Networks");
        assert_eq!(json["data"]["marked_new"], 1);
        assert_eq!(json["data"]["unknown_ids"][0], "GHOST-1");
    }

    #[tokio::test]
    #[serial]
    async fn unknown_device_is_not_found() {
        AppConfig::init_test_defaults();
        let state = AppState::new(setup_test_db().await);

        let response = receive_scans(
            State(state),
            keyed_headers("esp-test-key"),
            req("ESP_ROOM_404", &["2526B069"]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

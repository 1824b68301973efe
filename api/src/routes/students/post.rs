use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::state::AppState;
use common::format_validation_errors;
use db::models::{
    batch, department, semester, student_profile,
    user::{Model as User, Role},
};

lazy_static::lazy_static! {
    // Year pair, division letter, serial: e.g. 2526B069.
    static ref ROLL_NO_REGEX: regex::Regex = regex::Regex::new("^[0-9]{4}[A-Z][0-9]{3}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkStudentRow {
    #[validate(regex(path = *ROLL_NO_REGEX, message = "Roll number must be in format 2526B069"))]
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    pub dept_code: String,
    pub batch_year: i32,
    pub division: String,
}

#[derive(Debug, Serialize)]
pub struct BulkRowError {
    pub roll_no: String,
    pub error: String,
}

#[derive(Debug, Serialize, Default)]
pub struct BulkRegisterResponse {
    pub created: u64,
    pub skipped: u64,
    pub errors: Vec<BulkRowError>,
}

/// POST /students/bulk
///
/// Registers students in bulk. Each row is processed independently:
/// rows with a malformed roll number or referencing an unknown
/// department or batch are reported as errors, rows whose roll number
/// already has an account are skipped,
/// the rest get a student account (username = roll number, default
/// password = roll number) and profile. The active semester, when one
/// exists, is assigned as the student's current semester.
///
/// ### Request Body
/// ```json
/// [
///   {
///     "roll_no": "2526B069",
///     "first_name": "Asha",
///     "last_name": "Patel",
///     "dept_code": "CS",
///     "batch_year": 2025,
///     "division": "A"
///   }
/// ]
/// ```
pub async fn bulk_register(
    State(state): State<AppState>,
    Json(rows): Json<Vec<BulkStudentRow>>,
) -> impl IntoResponse {
    if rows.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<BulkRegisterResponse>::error("No rows provided")),
        );
    }

    let active_semester = match semester::Model::current_active(state.db()).await {
        Ok(sem) => sem.map(|s| s.id),
        Err(e) => return db_error(e),
    };

    let mut created = 0u64;
    let mut skipped = 0u64;
    let mut errors = Vec::new();

    for row in rows {
        if let Err(validation_errors) = row.validate() {
            errors.push(BulkRowError {
                roll_no: row.roll_no.clone(),
                error: format_validation_errors(&validation_errors),
            });
            continue;
        }
        let roll_no = row.roll_no.as_str();

        let dept = match department::Model::get_by_code(state.db(), &row.dept_code).await {
            Ok(Some(dept)) => dept,
            Ok(None) => {
                errors.push(BulkRowError {
                    roll_no: roll_no.to_owned(),
                    error: format!("Unknown department {}", row.dept_code),
                });
                continue;
            }
            Err(e) => return db_error(e),
        };

        let batch =
            match batch::Model::get_by_year_and_department(state.db(), row.batch_year, dept.id)
                .await
            {
                Ok(Some(batch)) => batch,
                Ok(None) => {
                    errors.push(BulkRowError {
                        roll_no: roll_no.to_owned(),
                        error: format!(
                            "No batch {} for department {}",
                            row.batch_year, row.dept_code
                        ),
                    });
                    continue;
                }
                Err(e) => return db_error(e),
            };

        match User::get_by_username(state.db(), roll_no).await {
            Ok(Some(_)) => {
                skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => return db_error(e),
        }

        let email = format!("{}@students.example.edu", roll_no.to_lowercase());
        let outcome = async {
            // Students change this default password at first login.
            let account = User::create(
                state.db(),
                roll_no,
                &email,
                roll_no,
                Role::Student,
                &row.first_name,
                &row.last_name,
            )
            .await?;
            student_profile::Model::create(
                state.db(),
                account.id,
                roll_no,
                dept.id,
                batch.id,
                active_semester,
                &row.division,
            )
            .await
        }
        .await;

        match outcome {
            Ok(_) => created += 1,
            Err(e) => errors.push(BulkRowError {
                roll_no: roll_no.to_owned(),
                error: e.to_string(),
            }),
        }
    }

    let message = format!("{created} students created, {skipped} skipped");
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            BulkRegisterResponse {
                created,
                skipped,
                errors,
            },
            message,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::{BulkStudentRow, bulk_register};
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum::{Json, http::StatusCode};
    use db::models::{batch, department, semester, student_profile, user};
    use db::test_utils::setup_test_db;
    use serde_json::Value;

    fn row(roll_no: &str, dept_code: &str, batch_year: i32) -> BulkStudentRow {
        BulkStudentRow {
            roll_no: roll_no.into(),
            first_name: "Test".into(),
            last_name: "Student".into(),
            dept_code: dept_code.into(),
            batch_year,
            division: "A".into(),
        }
    }

    #[tokio::test]
    async fn bulk_register_reports_per_row_outcomes() {
        let state = AppState::new(setup_test_db().await);
        let dept = department::Model::create(state.db(), "Computer Science", "CS")
            .await
            .unwrap();
        batch::Model::create(state.db(), 2025, dept.id).await.unwrap();
        let sem = semester::Model::create(state.db(), 3, true).await.unwrap();

        // Pre-existing account for the row that should be skipped.
        user::Model::create(
            state.db(),
            "2526B001",
            "2526b001@students.example.edu",
            "2526B001",
            user::Role::Student,
            "Already",
            "There",
        )
        .await
        .unwrap();

        let response = bulk_register(
            State(state.clone()),
            Json(vec![
                row("2526B001", "CS", 2025),  // skipped
                row("2526B002", "CS", 2025),  // created
                row("2526B003", "EE", 2025),  // unknown department
                row("2526B004", "CS", 1999),  // unknown batch
                row("not a roll", "CS", 2025), // malformed roll number
            ]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["created"], 1);
        assert_eq!(json["data"]["skipped"], 1);
        let errors = json["data"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(
            errors
                .iter()
                .any(|e| e["roll_no"] == "not a roll"
                    && e["error"].as_str().unwrap().contains("format"))
        );

        // The created student can log in with their roll number and got
        // the active semester.
        let account = user::Model::get_by_username(state.db(), "2526B002")
            .await
            .unwrap()
            .unwrap();
        assert!(account.verify_password("2526B002"));
        let profile = student_profile::Model::get_by_roll_no(state.db(), "2526B002")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.current_semester_id, Some(sem.id));
        assert_eq!(profile.user_id, account.id);
    }

    #[tokio::test]
    async fn bulk_register_rejects_empty_payload() {
        let state = AppState::new(setup_test_db().await);
        let response = bulk_register(State(state), Json(vec![])).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

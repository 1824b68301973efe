use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use crate::routes::common::{db_error, page_bounds};
use crate::state::AppState;
use db::models::{student_profile, user};

#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matched against roll number and first/last name.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentRow {
    pub user_id: i64,
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub department_id: i64,
    pub batch_id: i64,
    pub current_semester_id: Option<i64>,
    pub division: String,
}

#[derive(Debug, Serialize, Default)]
pub struct StudentListResponse {
    pub students: Vec<StudentRow>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /students
///
/// Paginated student roster: profile joined with the account behind it.
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<ListStudentsQuery>,
) -> impl IntoResponse {
    let (page, per_page) = page_bounds(params.page, params.per_page);

    let mut query = student_profile::Entity::find().find_also_related(user::Entity);
    if let Some(ref term) = params.q {
        query = query.filter(
            Condition::any()
                .add(student_profile::Column::RollNo.contains(term))
                .add(user::Column::FirstName.contains(term))
                .add(user::Column::LastName.contains(term)),
        );
    }

    let paginator = query
        .order_by_asc(student_profile::Column::RollNo)
        .paginate(state.db(), per_page);

    let total = match paginator.num_items().await {
        Ok(total) => total,
        Err(e) => return db_error(e),
    };
    let rows = match paginator.fetch_page(page - 1).await {
        Ok(rows) => rows,
        Err(e) => return db_error(e),
    };

    let students = rows
        .into_iter()
        .map(|(profile, account)| StudentRow {
            user_id: profile.user_id,
            roll_no: profile.roll_no,
            name: account.as_ref().map(|u| u.full_name()).unwrap_or_default(),
            email: account.map(|u| u.email).unwrap_or_default(),
            department_id: profile.department_id,
            batch_id: profile.batch_id,
            current_semester_id: profile.current_semester_id,
            division: profile.division,
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            StudentListResponse {
                students,
                page,
                per_page,
                total,
            },
            "Students retrieved",
        )),
    )
}

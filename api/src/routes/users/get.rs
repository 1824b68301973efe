use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use crate::routes::common::{db_error, page_bounds};
use crate::state::AppState;
use db::models::user::{self, Role};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matched against username and email.
    pub q: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Default)]
pub struct UserListResponse {
    pub users: Vec<user::Model>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /users
///
/// Paginated account listing with optional `q` (username/email
/// fragment) and `role` filters.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersQuery>,
) -> impl IntoResponse {
    let (page, per_page) = page_bounds(params.page, params.per_page);

    let mut query = user::Entity::find();
    if let Some(ref term) = params.q {
        query = query.filter(
            Condition::any()
                .add(user::Column::Username.contains(term))
                .add(user::Column::Email.contains(term)),
        );
    }
    if let Some(role) = params.role {
        query = query.filter(user::Column::Role.eq(role));
    }

    let paginator = query
        .order_by_asc(user::Column::Id)
        .paginate(state.db(), per_page);

    let total = match paginator.num_items().await {
        Ok(total) => total,
        Err(e) => return db_error(e),
    };
    let users = match paginator.fetch_page(page - 1).await {
        Ok(users) => users,
        Err(e) => return db_error(e),
    };

    (
        axum::http::StatusCode::OK,
        Json(ApiResponse::success(
            UserListResponse {
                users,
                page,
                per_page,
                total,
            },
            "Users retrieved",
        )),
    )
}

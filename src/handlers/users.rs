use crate::auth::AdminUser;
use crate::helpers::errors::{ApiError, database_error, not_found};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{Gender, UserRole, user};
use sea_orm::{EntityTrait, ModelTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub age: i32,
    pub gender: Gender,
    pub contact: String,
    pub role: UserRole,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            age: model.age,
            gender: model.gender,
            contact: model.contact,
            role: model.role,
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_users function");

    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve users", e))?;

    debug!("Retrieved {} users from database", users.len());
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    )))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    let existing = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve user", e))?
        .ok_or_else(|| {
            warn!("User with ID {} not found for deletion", user_id);
            not_found("User", user_id)
        })?;

    let username = existing.username.clone();
    existing
        .delete(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete user", e))?;

    info!("User '{}' (ID {}) deleted by '{}'", username, user_id, admin.username);
    Ok(StatusCode::NO_CONTENT)
}

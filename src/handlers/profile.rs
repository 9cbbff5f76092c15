use crate::auth::AuthUser;
use crate::helpers::errors::{ApiError, database_error, error_response};
use crate::helpers::params::required_text;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::{Gender, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Profile of the logged-in user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub username: String,
    pub full_name: String,
    pub age: i32,
    pub gender: Gender,
    pub contact: String,
}

impl From<user::Model> for ProfileResponse {
    fn from(model: user::Model) -> Self {
        Self {
            username: model.username,
            full_name: model.full_name,
            age: model.age,
            gender: model.gender,
            contact: model.contact,
        }
    }
}

/// Request body for updating the profile; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub contact: Option<String>,
}

/// Loads the users row of the caller. The configured administrator has none.
pub async fn find_profile(
    db: &DatabaseConnection,
    username: &str,
) -> Result<user::Model, ApiError> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(|e| database_error("Failed to load profile", e))?
        .ok_or_else(|| {
            warn!("No profile for '{}'", username);
            error_response(
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
                format!("No profile found for '{}'", username),
            )
        })
}

/// Get the profile of the logged-in user
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller has no profile", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering get_profile function");
    let profile = find_profile(&state.db, &user.username).await?;
    debug!("Loaded profile for '{}'", profile.username);

    Ok(Json(ApiResponse::ok(
        ProfileResponse::from(profile),
        "Profile retrieved successfully",
    )))
}

/// Update the profile of the logged-in user
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "A provided field is blank", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Caller has no profile", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering update_profile function");
    let existing = find_profile(&state.db, &user.username).await?;

    let mut active: user::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(full_name) = request.full_name {
        active.full_name = Set(required_text("full_name", &full_name)?);
        updated_fields.push("full_name");
    }
    if let Some(age) = request.age {
        active.age = Set(age);
        updated_fields.push("age");
    }
    if let Some(gender) = request.gender {
        active.gender = Set(gender);
        updated_fields.push("gender");
    }
    if let Some(contact) = request.contact {
        active.contact = Set(required_text("contact", &contact)?);
        updated_fields.push("contact");
    }

    debug!("Updating profile fields: {:?}", updated_fields);
    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update profile", e))?;

    info!("Profile of '{}' updated", updated.username);
    Ok(Json(ApiResponse::ok(
        ProfileResponse::from(updated),
        "Profile updated successfully",
    )))
}

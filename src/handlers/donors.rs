use crate::auth::AdminUser;
use crate::helpers::errors::{ApiError, database_error, not_found};
use crate::helpers::params::{parse_blood_group, parse_optional_blood_group, required_text};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{BloodGroup, Gender, donor};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for registering a donor
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateDonorRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    /// Blood group label, case-insensitive (e.g. "ab+")
    #[validate(length(min = 1))]
    pub blood_group: String,
    #[validate(length(min = 1))]
    pub contact: String,
}

/// Request body for updating a donor; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateDonorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub blood_group: Option<String>,
    pub contact: Option<String>,
}

/// Donor response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DonorResponse {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub contact: String,
}

impl From<donor::Model> for DonorResponse {
    fn from(model: donor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            gender: model.gender,
            blood_group: model.blood_group,
            contact: model.contact,
        }
    }
}

/// Query parameters for listing donors
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonorQuery {
    /// Only donors of this blood group (case-insensitive)
    pub blood_group: Option<String>,
}

/// Register a donor
#[utoipa::path(
    post,
    path = "/api/v1/donors",
    tag = "donors",
    request_body = CreateDonorRequest,
    responses(
        (status = 201, description = "Donor created", body = ApiResponse<DonorResponse>),
        (status = 400, description = "Blank field or unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_donor(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Valid(Json(request)): Valid<Json<CreateDonorRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<DonorResponse>>), ApiError> {
    trace!("Entering create_donor function");

    let new_donor = donor::ActiveModel {
        name: Set(required_text("name", &request.name)?),
        age: Set(request.age),
        gender: Set(request.gender),
        blood_group: Set(parse_blood_group(&request.blood_group)?),
        contact: Set(required_text("contact", &request.contact)?),
        ..Default::default()
    };

    let donor_model = new_donor
        .insert(&state.db)
        .await
        .map_err(|e| database_error("Failed to create donor", e))?;

    info!(
        "Donor created with ID: {}, blood group: {}",
        donor_model.id, donor_model.blood_group
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            DonorResponse::from(donor_model),
            "Donor created successfully",
        )),
    ))
}

/// List donors, optionally filtered by blood group
#[utoipa::path(
    get,
    path = "/api/v1/donors",
    tag = "donors",
    params(DonorQuery),
    responses(
        (status = 200, description = "Donors retrieved", body = ApiResponse<Vec<DonorResponse>>),
        (status = 400, description = "Unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_donors(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<DonorQuery>,
) -> Result<Json<ApiResponse<Vec<DonorResponse>>>, ApiError> {
    trace!("Entering get_donors function");

    let mut select = donor::Entity::find();
    if let Some(group) = parse_optional_blood_group(query.blood_group.as_deref())? {
        debug!("Filtering donors by blood group {}", group);
        select = select.filter(donor::Column::BloodGroup.eq(group));
    }

    let donors = select
        .order_by_asc(donor::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve donors", e))?;

    info!("Retrieved {} donor(s)", donors.len());
    Ok(Json(ApiResponse::ok(
        donors.into_iter().map(DonorResponse::from).collect(),
        "Donors retrieved successfully",
    )))
}

/// Get a donor by ID
#[utoipa::path(
    get,
    path = "/api/v1/donors/{donor_id}",
    tag = "donors",
    params(
        ("donor_id" = i32, Path, description = "Donor ID"),
    ),
    responses(
        (status = 200, description = "Donor retrieved", body = ApiResponse<DonorResponse>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Donor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_donor(
    Path(donor_id): Path<i32>,
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<DonorResponse>>, ApiError> {
    trace!("Entering get_donor function for donor_id: {}", donor_id);

    let donor_model = find_donor(&state, donor_id).await?;
    Ok(Json(ApiResponse::ok(
        DonorResponse::from(donor_model),
        "Donor retrieved successfully",
    )))
}

/// Update a donor
#[utoipa::path(
    put,
    path = "/api/v1/donors/{donor_id}",
    tag = "donors",
    params(
        ("donor_id" = i32, Path, description = "Donor ID"),
    ),
    request_body = UpdateDonorRequest,
    responses(
        (status = 200, description = "Donor updated", body = ApiResponse<DonorResponse>),
        (status = 400, description = "Blank field or unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Donor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_donor(
    Path(donor_id): Path<i32>,
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(request): Json<UpdateDonorRequest>,
) -> Result<Json<ApiResponse<DonorResponse>>, ApiError> {
    trace!("Entering update_donor function for donor_id: {}", donor_id);

    let existing = find_donor(&state, donor_id).await?;
    let mut active: donor::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        active.name = Set(required_text("name", &name)?);
        updated_fields.push("name");
    }
    if let Some(age) = request.age {
        active.age = Set(age);
        updated_fields.push("age");
    }
    if let Some(gender) = request.gender {
        active.gender = Set(gender);
        updated_fields.push("gender");
    }
    if let Some(blood_group) = request.blood_group {
        active.blood_group = Set(parse_blood_group(&blood_group)?);
        updated_fields.push("blood_group");
    }
    if let Some(contact) = request.contact {
        active.contact = Set(required_text("contact", &contact)?);
        updated_fields.push("contact");
    }

    debug!("Updating donor {} fields: {:?}", donor_id, updated_fields);
    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update donor", e))?;

    info!("Donor {} updated", updated.id);
    Ok(Json(ApiResponse::ok(
        DonorResponse::from(updated),
        "Donor updated successfully",
    )))
}

/// Delete a donor
///
/// Transactions that reference the donor keep their `donor_id`.
#[utoipa::path(
    delete,
    path = "/api/v1/donors/{donor_id}",
    tag = "donors",
    params(
        ("donor_id" = i32, Path, description = "Donor ID"),
    ),
    responses(
        (status = 204, description = "Donor deleted"),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Donor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_donor(
    Path(donor_id): Path<i32>,
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_donor function for donor_id: {}", donor_id);

    let existing = find_donor(&state, donor_id).await?;
    existing
        .delete(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete donor", e))?;

    info!("Donor {} deleted", donor_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn find_donor(state: &AppState, donor_id: i32) -> Result<donor::Model, ApiError> {
    donor::Entity::find_by_id(donor_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve donor", e))?
        .ok_or_else(|| {
            warn!("Donor with ID {} not found", donor_id);
            not_found("Donor", donor_id)
        })
}

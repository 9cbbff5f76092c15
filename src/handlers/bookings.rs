use crate::auth::AuthUser;
use crate::handlers::profile::find_profile;
use crate::helpers::errors::{ApiError, database_error, not_found};
use crate::helpers::params::{parse_blood_group, required_text};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use model::entities::{BloodGroup, booking};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for booking a donation slot
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Defaults to the caller's profile name
    pub full_name: Option<String>,
    /// Defaults to the caller's profile contact
    pub contact: Option<String>,
    /// Blood group label, case-insensitive
    pub blood_group: String,
    pub center: String,
    /// Day of the slot (YYYY-MM-DD)
    pub booking_date: NaiveDate,
    /// Slot label, stored as given (e.g. "10:00 AM")
    pub booking_time: String,
}

/// Booking response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub contact: String,
    pub blood_group: BloodGroup,
    pub center: String,
    pub booking_date: NaiveDate,
    pub booking_time: String,
    pub created_at: NaiveDateTime,
}

impl From<booking::Model> for BookingResponse {
    fn from(model: booking::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            contact: model.contact,
            blood_group: model.blood_group,
            center: model.center,
            booking_date: model.booking_date,
            booking_time: model.booking_time,
            created_at: model.created_at,
        }
    }
}

/// Book a donation slot
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking stored", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Blank field or unknown blood group", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    trace!("Entering create_booking function");

    let (full_name, contact) = match (request.full_name, request.contact) {
        (Some(full_name), Some(contact)) => (full_name, contact),
        (full_name, contact) => {
            debug!("Filling booking details from the profile of '{}'", user.username);
            let profile = match find_profile(&state.db, &user.username).await {
                Ok(profile) => Some(profile),
                Err((_, Json(body))) if body.code == "PROFILE_NOT_FOUND" => {
                    debug!("No profile for '{}', details must be supplied", user.username);
                    None
                }
                Err(api_error) => return Err(api_error),
            };
            (
                full_name
                    .or_else(|| profile.as_ref().map(|p| p.full_name.clone()))
                    .unwrap_or_default(),
                contact
                    .or_else(|| profile.as_ref().map(|p| p.contact.clone()))
                    .unwrap_or_default(),
            )
        }
    };

    let new_booking = booking::ActiveModel {
        username: Set(user.username.clone()),
        full_name: Set(required_text("full_name", &full_name)?),
        contact: Set(required_text("contact", &contact)?),
        blood_group: Set(parse_blood_group(&request.blood_group)?),
        center: Set(required_text("center", &request.center)?),
        booking_date: Set(request.booking_date),
        booking_time: Set(required_text("booking_time", &request.booking_time)?),
        created_at: Set(Local::now().naive_local()),
        ..Default::default()
    };

    let booking_model = new_booking
        .insert(&state.db)
        .await
        .map_err(|e| database_error("Failed to create booking", e))?;

    info!(
        "Booking {} created for '{}' at {} on {} {}",
        booking_model.id,
        booking_model.username,
        booking_model.center,
        booking_model.booking_date,
        booking_model.booking_time
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            BookingResponse::from(booking_model),
            "Booking created successfully",
        )),
    ))
}

/// List the caller's bookings by slot
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    responses(
        (status = 200, description = "Bookings retrieved", body = ApiResponse<Vec<BookingResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    trace!("Entering get_bookings function");

    let bookings = booking::Entity::find()
        .filter(booking::Column::Username.eq(user.username.as_str()))
        .order_by_asc(booking::Column::BookingDate)
        .order_by_asc(booking::Column::BookingTime)
        .order_by_asc(booking::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve bookings", e))?;

    debug!("'{}' has {} booking(s)", user.username, bookings.len());
    Ok(Json(ApiResponse::ok(
        bookings.into_iter().map(BookingResponse::from).collect(),
        "Bookings retrieved successfully",
    )))
}

/// Cancel one of the caller's bookings
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    tag = "bookings",
    params(
        ("booking_id" = i32, Path, description = "Booking ID"),
    ),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such booking owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn cancel_booking(
    Path(booking_id): Path<i32>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering cancel_booking function for booking_id: {}", booking_id);

    let existing = booking::Entity::find_by_id(booking_id)
        .filter(booking::Column::Username.eq(user.username.as_str()))
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve booking", e))?
        .ok_or_else(|| {
            warn!("Booking {} not found for '{}'", booking_id, user.username);
            not_found("Booking", booking_id)
        })?;

    existing
        .delete(&state.db)
        .await
        .map_err(|e| database_error("Failed to cancel booking", e))?;

    info!("Booking {} cancelled by '{}'", booking_id, user.username);
    Ok(StatusCode::NO_CONTENT)
}

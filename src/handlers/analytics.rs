use crate::auth::AdminUser;
use crate::helpers::errors::{ApiError, compute_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use common::{DailyUnits, GenderCount};
use compute::stock::{donations_over_time, gender_distribution};
use tracing::{debug, instrument, trace};

/// Donated units per day, for the donations line chart
#[utoipa::path(
    get,
    path = "/api/v1/analytics/donations",
    tag = "analytics",
    responses(
        (status = 200, description = "Daily donation totals, oldest first", body = ApiResponse<Vec<DailyUnits>>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_donations_over_time(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<DailyUnits>>>, ApiError> {
    trace!("Entering get_donations_over_time function");

    let series = donations_over_time(&state.db).await.map_err(compute_error)?;

    debug!("Donation series has {} point(s)", series.len());
    Ok(Json(ApiResponse::ok(series, "Donations over time retrieved successfully")))
}

/// Donor counts per gender, for the gender pie chart
#[utoipa::path(
    get,
    path = "/api/v1/analytics/donor-genders",
    tag = "analytics",
    responses(
        (status = 200, description = "Donor count per gender", body = ApiResponse<Vec<GenderCount>>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_donor_genders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<GenderCount>>>, ApiError> {
    trace!("Entering get_donor_genders function");

    let counts = gender_distribution(&state.db).await.map_err(compute_error)?;
    Ok(Json(ApiResponse::ok(counts, "Donor gender distribution retrieved successfully")))
}

use crate::auth::AuthUser;
use crate::helpers::errors::{ApiError, compute_error};
use crate::helpers::params::parse_blood_group;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::Json,
};
use common::StockLevel;
use compute::stock::{groups_needed, stock_level, stock_levels};
use tracing::{debug, info, instrument, trace};

/// Current stock of every blood group
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    tag = "stock",
    responses(
        (status = 200, description = "Levels of all eight groups in report order", body = ApiResponse<Vec<StockLevel>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stock(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<StockLevel>>>, ApiError> {
    trace!("Entering get_stock function");

    let levels = stock_levels(&state.db, state.settings.low_stock_threshold)
        .await
        .map_err(compute_error)?;

    debug!("Reporting {} stock level(s)", levels.len());
    Ok(Json(ApiResponse::ok(levels, "Stock retrieved successfully")))
}

/// Stock and availability of one blood group
#[utoipa::path(
    get,
    path = "/api/v1/stock/{blood_group}",
    tag = "stock",
    params(
        ("blood_group" = String, Path, description = "Blood group label, case-insensitive; encode `+` as `%2B`"),
    ),
    responses(
        (status = 200, description = "Level of the group", body = ApiResponse<StockLevel>),
        (status = 400, description = "Unknown blood group", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stock_for_group(
    Path(blood_group): Path<String>,
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<StockLevel>>, ApiError> {
    trace!("Entering get_stock_for_group function for {}", blood_group);
    let group = parse_blood_group(&blood_group)?;

    let level = stock_level(&state.db, group, state.settings.low_stock_threshold)
        .await
        .map_err(compute_error)?;

    info!("{} has {} unit(s), status {:?}", level.blood_group, level.units, level.status);
    Ok(Json(ApiResponse::ok(level, "Stock level retrieved successfully")))
}

/// Blood groups currently below the low-stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/stock/needed",
    tag = "stock",
    responses(
        (status = 200, description = "Low groups in report order", body = ApiResponse<Vec<StockLevel>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_needed_groups(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<StockLevel>>>, ApiError> {
    trace!("Entering get_needed_groups function");

    let levels = stock_levels(&state.db, state.settings.low_stock_threshold)
        .await
        .map_err(compute_error)?;
    let needed = groups_needed(&levels);

    debug!("{} group(s) are low", needed.len());
    Ok(Json(ApiResponse::ok(needed, "Needed blood groups retrieved successfully")))
}

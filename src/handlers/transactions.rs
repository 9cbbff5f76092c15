use crate::auth::AdminUser;
use crate::helpers::errors::{ApiError, compute_error, database_error, not_found};
use crate::helpers::params::{parse_blood_group, parse_optional_blood_group};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use compute::ledger::{self, TransactionFilter};
use model::entities::{BloodGroup, TransactionKind, stock_transaction};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

/// Request body for recording a donation
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DonationRequest {
    /// Blood group label, case-insensitive
    pub blood_group: String,
    /// Units received, at least 1
    pub units: i32,
    /// Registered donor who gave the units
    pub donor_id: Option<i32>,
}

/// Request body for issuing blood
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IssueRequest {
    /// Blood group label, case-insensitive
    pub blood_group: String,
    /// Units handed out, at least 1
    pub units: i32,
}

/// Transaction log entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub donor_id: Option<i32>,
    pub blood_group: BloodGroup,
    pub units: i32,
    pub kind: TransactionKind,
    pub created_at: NaiveDateTime,
}

impl From<stock_transaction::Model> for TransactionResponse {
    fn from(model: stock_transaction::Model) -> Self {
        Self {
            id: model.id,
            donor_id: model.donor_id,
            blood_group: model.blood_group,
            units: model.units,
            kind: model.kind,
            created_at: model.created_at,
        }
    }
}

/// Query parameters for reading the transaction log
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    /// Only entries of this kind
    pub kind: Option<TransactionKind>,
    /// Only entries of this blood group (case-insensitive)
    pub blood_group: Option<String>,
}

/// Record a donation and credit the stock
#[utoipa::path(
    post,
    path = "/api/v1/transactions/donations",
    tag = "transactions",
    request_body = DonationRequest,
    responses(
        (status = 201, description = "Donation recorded", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid units or unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Donor not found", body = ErrorResponse),
        (status = 409, description = "Stock counter cannot hold the donation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn record_donation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<DonationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    trace!("Entering record_donation function");
    let group = parse_blood_group(&request.blood_group)?;

    let entry = ledger::record_donation(&state.db, group, request.units, request.donor_id)
        .await
        .map_err(compute_error)?;

    info!(
        "'{}' recorded donation {} of {} unit(s) {}",
        admin.username, entry.id, entry.units, entry.blood_group
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TransactionResponse::from(entry),
            "Donation recorded successfully",
        )),
    ))
}

/// Issue blood and debit the stock
#[utoipa::path(
    post,
    path = "/api/v1/transactions/issues",
    tag = "transactions",
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Issue recorded", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid units or unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 409, description = "Not enough units in stock", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn record_issue(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<IssueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    trace!("Entering record_issue function");
    let group = parse_blood_group(&request.blood_group)?;

    let entry = ledger::record_issue(&state.db, group, request.units)
        .await
        .map_err(compute_error)?;

    info!(
        "'{}' issued {} unit(s) of {} (transaction {})",
        admin.username, entry.units, entry.blood_group, entry.id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TransactionResponse::from(entry),
            "Blood issued successfully",
        )),
    ))
}

/// Read the transaction log, newest first
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions retrieved", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 400, description = "Unknown blood group", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ApiError> {
    trace!("Entering get_transactions function");

    let filter = TransactionFilter {
        kind: query.kind,
        blood_group: parse_optional_blood_group(query.blood_group.as_deref())?,
    };
    debug!("Transaction filter: {:?}", filter);

    let entries = ledger::list_transactions(&state.db, &filter)
        .await
        .map_err(compute_error)?;

    info!("Retrieved {} transaction(s)", entries.len());
    Ok(Json(ApiResponse::ok(
        entries.into_iter().map(TransactionResponse::from).collect(),
        "Transactions retrieved successfully",
    )))
}

/// Get a transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved", body = ApiResponse<TransactionResponse>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<TransactionResponse>>, ApiError> {
    trace!("Entering get_transaction function for transaction_id: {}", transaction_id);

    let entry = stock_transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve transaction", e))?
        .ok_or_else(|| {
            warn!("Transaction with ID {} not found", transaction_id);
            not_found("Transaction", transaction_id)
        })?;

    Ok(Json(ApiResponse::ok(
        TransactionResponse::from(entry),
        "Transaction retrieved successfully",
    )))
}

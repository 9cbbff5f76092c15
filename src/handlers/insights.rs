use crate::auth::AdminUser;
use crate::helpers::errors::{ApiError, compute_error};
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};
use axum::{extract::State, response::Json};
use common::InsightsReport;
use compute::{build_insights_prompt, stock::stock_levels};
use tracing::{debug, info, instrument, trace};

/// Ask the language model for an analysis of the current stock
///
/// Identical stock snapshots are answered from the cache until it expires.
#[utoipa::path(
    post,
    path = "/api/v1/insights",
    tag = "insights",
    responses(
        (status = 200, description = "Insights generated", body = ApiResponse<InsightsReport>),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 502, description = "The model provider failed", body = ErrorResponse),
        (status = 503, description = "No API key is configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn generate_insights(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<InsightsReport>>, ApiError> {
    trace!("Entering generate_insights function");

    let stock = stock_levels(&state.db, state.settings.low_stock_threshold)
        .await
        .map_err(compute_error)?;
    let prompt = build_insights_prompt(&stock);
    let cache_key = format!("insights_{}", blake3::hash(prompt.as_bytes()).to_hex());

    if let Some(CachedData::Insights(text)) = state.cache.get(&cache_key).await {
        debug!("Serving insights from cache");
        let report = InsightsReport {
            text,
            cached: true,
            stock,
        };
        return Ok(Json(ApiResponse::ok(report, "Insights retrieved from cache")));
    }

    let text = state
        .insights
        .generate(&prompt)
        .await
        .map_err(compute_error)?;

    state
        .cache
        .insert(cache_key, CachedData::Insights(text.clone()))
        .await;

    info!("Generated insights for '{}'", admin.username);
    let report = InsightsReport {
        text,
        cached: false,
        stock,
    };
    Ok(Json(ApiResponse::ok(report, "Insights generated successfully")))
}

use axum::{http::StatusCode, response::Json};
use compute::ComputeError;
use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

pub fn not_found(what: &str, id: i32) -> ApiError {
    error_response(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        format!("{} with ID {} not found", what, id),
    )
}

/// Logs a database failure and hides its details from the client.
pub fn database_error(context: &str, db_error: DbErr) -> ApiError {
    error!("{}: {}", context, db_error);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "DATABASE_ERROR",
        format!("{} due to a database error", context),
    )
}

/// True when the error is a unique constraint violation.
pub fn is_unique_violation(db_error: &DbErr) -> bool {
    matches!(
        db_error.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    )
}

/// Maps compute failures onto status codes and error codes.
pub fn compute_error(compute_error: ComputeError) -> ApiError {
    let (status, code) = match &compute_error {
        ComputeError::InvalidUnits(_) => (StatusCode::BAD_REQUEST, "INVALID_UNITS"),
        ComputeError::UnknownBloodGroup(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_BLOOD_GROUP"),
        ComputeError::DonorNotFound(_) => (StatusCode::NOT_FOUND, "DONOR_NOT_FOUND"),
        ComputeError::InsufficientStock { .. } => (StatusCode::CONFLICT, "INSUFFICIENT_STOCK"),
        ComputeError::StockCapacityExceeded { .. } => (StatusCode::CONFLICT, "STOCK_CAPACITY_EXCEEDED"),
        ComputeError::StockRowMissing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STOCK_ROW_MISSING"),
        ComputeError::InsightsUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "INSIGHTS_UNAVAILABLE"),
        ComputeError::Insights(_) => (StatusCode::BAD_GATEWAY, "INSIGHTS_FAILED"),
        ComputeError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
    };

    if status.is_server_error() {
        error!("Request failed: {}", compute_error);
    }

    let message = match compute_error {
        ComputeError::Database(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };
    error_response(status, code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::BloodGroup;

    #[test]
    fn test_insufficient_stock_is_conflict() {
        let (status, body) = compute_error(ComputeError::InsufficientStock {
            blood_group: BloodGroup::ONegative,
            available: 1,
            requested: 4,
        });

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "INSUFFICIENT_STOCK");
        assert!(body.error.contains("O-"));
        assert!(!body.success);
    }

    #[test]
    fn test_capacity_overflow_is_conflict() {
        let (status, body) = compute_error(ComputeError::StockCapacityExceeded {
            blood_group: BloodGroup::APositive,
            available: i32::MAX,
            requested: 1,
        });

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "STOCK_CAPACITY_EXCEEDED");
    }

    #[test]
    fn test_unique_violation_ignores_message_text() {
        let db_error = DbErr::Custom("unique index rebuild failed".to_string());
        assert!(!is_unique_violation(&db_error));
    }

    #[test]
    fn test_insights_errors() {
        let (status, body) = compute_error(ComputeError::InsightsUnavailable);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "INSIGHTS_UNAVAILABLE");

        let (status, body) = compute_error(ComputeError::Insights("timeout".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "INSIGHTS_FAILED");
    }

    #[test]
    fn test_database_details_are_hidden() {
        let (status, body) = compute_error(ComputeError::Database(DbErr::Custom(
            "disk I/O error at /var/lib".to_string(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.contains("/var/lib"));
    }
}

use axum::http::StatusCode;
use model::entities::BloodGroup;
use tracing::warn;

use super::errors::{ApiError, error_response};

/// Parses a blood group label from a path or query parameter.
pub fn parse_blood_group(raw: &str) -> Result<BloodGroup, ApiError> {
    raw.parse::<BloodGroup>().map_err(|e| {
        warn!("{}", e);
        error_response(StatusCode::BAD_REQUEST, "UNKNOWN_BLOOD_GROUP", e.to_string())
    })
}

/// Parses an optional filter parameter; blank values mean no filter.
pub fn parse_optional_blood_group(raw: Option<&str>) -> Result<Option<BloodGroup>, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_blood_group(value).map(Some),
        None => Ok(None),
    }
}

/// Trims a required text field, rejecting blank input.
pub fn required_text(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "MISSING_FIELD",
            format!("Field '{}' must not be blank", field),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blood_group() {
        assert_eq!(parse_blood_group("o-").unwrap(), BloodGroup::ONegative);

        let (status, body) = parse_blood_group("Z+").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "UNKNOWN_BLOOD_GROUP");
    }

    #[test]
    fn test_blank_filter_means_none() {
        assert_eq!(parse_optional_blood_group(None).unwrap(), None);
        assert_eq!(parse_optional_blood_group(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_blood_group(Some("ab+")).unwrap(),
            Some(BloodGroup::AbPositive)
        );
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Ann ").unwrap(), "Ann");
        let (status, body) = required_text("name", "   ").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MISSING_FIELD");
    }
}

#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::{RefOr, schema::Schema};

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for name in [
            "ErrorResponse",
            "HealthResponse",
            "StockLevel",
            "DonorResponse",
            "TransactionResponse",
            "BookingResponse",
            "InsightsReport",
            "BloodGroup",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let schema = components.schemas.get("ErrorResponse").unwrap();

        if let RefOr::T(Schema::Object(obj)) = schema {
            assert!(obj.properties.contains_key("error"));
            assert!(obj.properties.contains_key("code"));
            assert!(obj.properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_all_routes_are_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/health",
            "/api/v1/auth/signup",
            "/api/v1/auth/login",
            "/api/v1/profile",
            "/api/v1/donors",
            "/api/v1/donors/{donor_id}",
            "/api/v1/stock",
            "/api/v1/stock/{blood_group}",
            "/api/v1/stock/needed",
            "/api/v1/transactions",
            "/api/v1/transactions/donations",
            "/api/v1/transactions/issues",
            "/api/v1/transactions/{transaction_id}",
            "/api/v1/bookings",
            "/api/v1/bookings/{booking_id}",
            "/api/v1/analytics/donations",
            "/api/v1/analytics/donor-genders",
            "/api/v1/insights",
            "/api/v1/users",
            "/api/v1/users/{user_id}",
        ] {
            assert!(paths.contains_key(path), "undocumented path {}", path);
        }
    }

    #[test]
    fn test_blood_group_schema_uses_labels() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("\"AB+\""));
        assert!(json.contains("\"O-\""));
    }
}

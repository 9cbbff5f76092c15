use crate::handlers::{
    analytics::{get_donations_over_time, get_donor_genders},
    auth::{login, signup},
    bookings::{cancel_booking, create_booking, get_bookings},
    donors::{create_donor, delete_donor, get_donor, get_donors, update_donor},
    health::health_check,
    insights::generate_insights,
    profile::{get_profile, update_profile},
    stock::{get_needed_groups, get_stock, get_stock_for_group},
    transactions::{get_transaction, get_transactions, record_donation, record_issue},
    users::{delete_user, get_users},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router: Router<AppState> = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        // Profile of the caller
        .route("/api/v1/profile", get(get_profile).put(update_profile))
        // Donor registry
        .route("/api/v1/donors", post(create_donor).get(get_donors))
        .route(
            "/api/v1/donors/:donor_id",
            get(get_donor).put(update_donor).delete(delete_donor),
        )
        // Stock
        .route("/api/v1/stock", get(get_stock))
        .route("/api/v1/stock/needed", get(get_needed_groups))
        .route("/api/v1/stock/:blood_group", get(get_stock_for_group))
        // Ledger
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/donations", post(record_donation))
        .route("/api/v1/transactions/issues", post(record_issue))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        // Bookings
        .route("/api/v1/bookings", post(create_booking).get(get_bookings))
        .route("/api/v1/bookings/:booking_id", delete(cancel_booking))
        // Dashboard
        .route("/api/v1/analytics/donations", get(get_donations_over_time))
        .route("/api/v1/analytics/donor-genders", get(get_donor_genders))
        .route("/api/v1/insights", post(generate_insights))
        // Account administration
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The metrics recorder is process-global, so it is only installed outside tests
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

use common::{DailyUnits, GenderCount, InsightsReport, StockLevel, StockStatus};
use compute::InsightGenerator;
use model::entities::{BloodGroup, Gender, TransactionKind, UserRole};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;
use crate::handlers::{
    auth::{LoginRequest, SignupRequest, TokenResponse},
    bookings::{BookingResponse, CreateBookingRequest},
    donors::{CreateDonorRequest, DonorResponse, UpdateDonorRequest},
    profile::{ProfileResponse, UpdateProfileRequest},
    transactions::{DonationRequest, IssueRequest, TransactionResponse},
    users::UserResponse,
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
    /// Runtime settings
    pub settings: Arc<Settings>,
    /// Text generator used for AI insights
    pub insights: Arc<dyn InsightGenerator>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    /// Generated insights text, keyed by the prompt hash
    Insights(String),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::profile::get_profile,
        crate::handlers::profile::update_profile,
        crate::handlers::donors::create_donor,
        crate::handlers::donors::get_donors,
        crate::handlers::donors::get_donor,
        crate::handlers::donors::update_donor,
        crate::handlers::donors::delete_donor,
        crate::handlers::stock::get_stock,
        crate::handlers::stock::get_stock_for_group,
        crate::handlers::stock::get_needed_groups,
        crate::handlers::transactions::record_donation,
        crate::handlers::transactions::record_issue,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::get_bookings,
        crate::handlers::bookings::cancel_booking,
        crate::handlers::analytics::get_donations_over_time,
        crate::handlers::analytics::get_donor_genders,
        crate::handlers::insights::generate_insights,
        crate::handlers::users::get_users,
        crate::handlers::users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<TokenResponse>,
            ApiResponse<ProfileResponse>,
            ApiResponse<DonorResponse>,
            ApiResponse<Vec<DonorResponse>>,
            ApiResponse<StockLevel>,
            ApiResponse<Vec<StockLevel>>,
            ApiResponse<TransactionResponse>,
            ApiResponse<Vec<TransactionResponse>>,
            ApiResponse<BookingResponse>,
            ApiResponse<Vec<BookingResponse>>,
            ApiResponse<Vec<DailyUnits>>,
            ApiResponse<Vec<GenderCount>>,
            ApiResponse<InsightsReport>,
            ApiResponse<Vec<UserResponse>>,
            ErrorResponse,
            HealthResponse,
            SignupRequest,
            LoginRequest,
            TokenResponse,
            ProfileResponse,
            UpdateProfileRequest,
            CreateDonorRequest,
            UpdateDonorRequest,
            DonorResponse,
            DonationRequest,
            IssueRequest,
            TransactionResponse,
            CreateBookingRequest,
            BookingResponse,
            UserResponse,
            StockLevel,
            StockStatus,
            DailyUnits,
            GenderCount,
            InsightsReport,
            BloodGroup,
            Gender,
            TransactionKind,
            UserRole,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-up and login"),
        (name = "profile", description = "Profile of the logged-in user"),
        (name = "donors", description = "Donor registry (admin)"),
        (name = "stock", description = "Blood stock levels"),
        (name = "transactions", description = "Donation and issue ledger (admin)"),
        (name = "bookings", description = "Donation slot bookings"),
        (name = "analytics", description = "Dashboard chart data (admin)"),
        (name = "insights", description = "AI stock insights (admin)"),
        (name = "users", description = "User account administration (admin)"),
    ),
    info(
        title = "LifeLink API",
        description = "Blood bank administration API - donors, stock, donations, issues and bookings",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::helpers::errors::{ApiError, database_error, error_response, is_unique_violation};
use crate::helpers::params::required_text;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use model::entities::{Gender, UserRole, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SignupRequest {
    /// Username (must be unique)
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    pub age: i32,
    pub gender: Gender,
    #[validate(length(min = 1))]
    pub contact: String,
}

/// Request body for logging in
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session token returned by a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub token_type: String,
    pub username: String,
    pub role: UserRole,
    /// Lifetime of the token in seconds
    pub expires_in: i64,
}

fn invalid_credentials() -> ApiError {
    error_response(
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        "Invalid username or password",
    )
}

fn username_taken(username: &str) -> ApiError {
    error_response(
        StatusCode::CONFLICT,
        "USERNAME_ALREADY_EXISTS",
        format!("Username '{}' already exists", username),
    )
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<TokenResponse>),
        (status = 400, description = "A required field is blank", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(username = %request.username))]
pub async fn signup(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SignupRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), ApiError> {
    trace!("Entering signup function");

    let username = required_text("username", &request.username)?;
    let password = required_text("password", &request.password)?;
    let full_name = required_text("full_name", &request.full_name)?;
    let contact = required_text("contact", &request.contact)?;

    if username == state.settings.admin_username {
        warn!("Signup attempted with the administrator username");
        return Err(username_taken(&username));
    }

    let password_hash = hash_password(&password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "PASSWORD_HASH_ERROR",
            "Failed to store password",
        )
    })?;

    let new_user = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        full_name: Set(full_name),
        age: Set(request.age),
        gender: Set(request.gender),
        contact: Set(contact),
        role: Set(UserRole::User),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    let user_model = match new_user.insert(&state.db).await {
        Ok(model) => model,
        Err(db_error) if is_unique_violation(&db_error) => {
            warn!("Username '{}' already exists", username);
            return Err(username_taken(&username));
        }
        Err(db_error) => return Err(database_error("Failed to create user", db_error)),
    };

    info!("User created with ID: {}, username: {}", user_model.id, user_model.username);
    let token = session_token(&state, &user_model.username, Some(user_model.id), user_model.role)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(token, "Account created successfully")),
    ))
}

/// Log in as a user or as the configured administrator
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    trace!("Entering login function");
    let username = request.username.trim();

    if username == state.settings.admin_username
        && request.password == state.settings.admin_password
    {
        info!("Administrator logged in");
        let token = session_token(&state, username, None, UserRole::Admin)?;
        return Ok(Json(ApiResponse::ok(token, "Logged in successfully")));
    }

    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to look up user", e))?;

    let Some(user_model) = found else {
        debug!("Login failed, no such user");
        return Err(invalid_credentials());
    };

    if !verify_password(&request.password, &user_model.password_hash) {
        debug!("Login failed, wrong password");
        return Err(invalid_credentials());
    }

    info!("User '{}' logged in", user_model.username);
    let token = session_token(&state, &user_model.username, Some(user_model.id), user_model.role)?;
    Ok(Json(ApiResponse::ok(token, "Logged in successfully")))
}

fn session_token(
    state: &AppState,
    username: &str,
    user_id: Option<i32>,
    role: UserRole,
) -> Result<TokenResponse, ApiError> {
    let ttl_hours = state.settings.token_ttl_hours;
    let token = issue_token(username, user_id, role, &state.settings.jwt_secret, ttl_hours).map_err(|e| {
        error!("Failed to issue token: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TOKEN_ERROR",
            "Failed to issue session token",
        )
    })?;

    Ok(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        username: username.to_string(),
        role,
        expires_in: ttl_hours * 3600,
    })
}

//! Password hashing, session tokens and the request extractors that guard
//! the API.
//!
//! Tokens are HS256 JWTs signed with the configured secret. The configured
//! admin account lives only in settings; every other principal is a row of
//! the users table.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use model::entities::{UserRole, user};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::helpers::errors::{ApiError, database_error, error_response};
use crate::schemas::AppState;

/// Errors raised while authenticating a request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("account no longer exists")]
    UnknownAccount,
}

/// Hashes a password with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Checks a password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the principal
    pub sub: String,
    /// Row id of the account; absent for the configured administrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i32>,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Signs a token for `username` valid for `ttl_hours`.
pub fn issue_token(
    username: &str,
    user_id: Option<i32>,
    role: UserRole,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        uid: user_id,
        role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verifies signature and expiry of a token and returns its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidToken(e.to_string()),
    })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Any authenticated principal.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            debug!("Request without bearer token");
            error_response(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                AuthError::MissingToken.to_string(),
            )
        })?;

        let claims = decode_token(token, &state.settings.jwt_secret).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
        })?;

        if claims.uid.is_none()
            && claims.role == UserRole::Admin
            && claims.sub == state.settings.admin_username
        {
            trace!("Authenticated the configured administrator");
            return Ok(AuthUser {
                username: claims.sub,
                role: claims.role,
            });
        }

        // A deleted or re-registered account must not keep its old sessions
        let account = user::Entity::find()
            .filter(user::Column::Username.eq(claims.sub.as_str()))
            .one(&state.db)
            .await
            .map_err(|e| database_error("Failed to look up account", e))?
            .filter(|account| Some(account.id) == claims.uid)
            .ok_or_else(|| {
                warn!("Token for '{}' refers to a missing account", claims.sub);
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    AuthError::UnknownAccount.to_string(),
                )
            })?;

        trace!("Authenticated '{}' as {:?}", account.username, account.role);
        Ok(AuthUser {
            username: account.username,
            role: account.role,
        })
    }
}

/// An authenticated principal with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            warn!("User '{}' attempted an admin operation", user.username);
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Administrator access required",
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let stored = hash_password("s3cret").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("s3cret"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("S3cret", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("pw", "no-separator"));
        assert!(!verify_password("pw", "salt$not-hex"));
        assert!(!verify_password("pw", "$argon2id$v=19$m=19456,t=2,p=1$broken"));
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("alice", Some(7), UserRole::User, "secret", 1).unwrap();
        let claims = decode_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, Some(7));
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = issue_token("alice", None, UserRole::Admin, "secret", 1).unwrap();
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token("alice", Some(1), UserRole::User, "secret", -2).unwrap();
        assert!(matches!(decode_token(&token, "secret"), Err(AuthError::Expired)));
    }
}

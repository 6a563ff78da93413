//! Admin JWT authentication for the analytics API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// Role claim required for analytics access
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims issued by the storefront identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// `admin` | `customer` | ...
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin extracted from the JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub user_id: String,
    pub email: String,
}

/// Create a signed token the way the identity provider does
#[cfg(test)]
pub fn create_token(
    user_id: &str,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AdminClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(8)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify the bearer token and require the admin role
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let claims = token_data.claims;
    if claims.role != ADMIN_ROLE {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "Non-admin analytics access denied");
        return Err(AppError::admin_required());
    }

    request.extensions_mut().insert(AdminIdentity {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{header, request::Parts};
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication, or
/// `Option<AuthUser>` where a token is optional. A token that is present but
/// invalid is rejected in both cases.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthUser {
    /// Verify a raw token and build the caller identity from its claims.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, AppError> {
        let claims = jwt::verify(token, secret).map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            AppError::TokenInvalid
        })?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AppError::TokenInvalid)?;

        Ok(AuthUser {
            email: claims.sub,
            expires_at,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::TokenInvalid)?;

        Self::from_token(token, &state.config.auth.jwt_secret)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

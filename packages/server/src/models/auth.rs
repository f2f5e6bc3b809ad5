use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Whether `email` has a local part, an `@`, a domain and a TLD of 2+ letters.
pub fn is_email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".into(),
        ));
    }
    if !is_email_valid(payload.email.trim()) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    Ok(())
}

/// Request body for login.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Request body for resetting the caller's own password.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Must equal the email in the caller's token.
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "n3w_P@ss!")]
    pub new_password: String,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(default)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Successful login response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    /// HS256 bearer token valid for 24 hours.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Public view of an account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = "admin@example.com")]
    pub email: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub valid: bool,
    #[schema(example = "admin@example.com")]
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

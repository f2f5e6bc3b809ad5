use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, UserResponse,
    VerifyTokenRequest, VerifyTokenResponse,
};
use crate::models::shared::{Envelope, MessageResponse};
use crate::services::auth::AuthService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new user",
    description = "Creates an account. Only the stored email is returned.",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = Envelope<UserResponse>),
        (status = 400, description = "Missing field or malformed email (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<Envelope<UserResponse>>, AppError> {
    let email = AuthService::new(&state.db, &state.config.auth.jwt_secret)
        .register(&payload)
        .await?;

    Ok(Json(Envelope::with_data(
        "User created successfully",
        UserResponse { email },
    )))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in and obtain a token",
    description = "Returns an HS256 bearer token valid for 24 hours. Unknown email and wrong \
        password produce the same error.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let resp = AuthService::new(&state.db, &state.config.auth.jwt_secret)
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "Auth",
    operation_id = "verifyToken",
    summary = "Check a token",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 401, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn verify_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, AppError> {
    let token = payload.token.trim();
    if token.is_empty() {
        return Err(AppError::TokenMissing);
    }
    let caller = AuthUser::from_token(token, &state.config.auth.jwt_secret)?;

    Ok(Json(VerifyTokenResponse {
        valid: true,
        email: caller.email,
        expires_at: caller.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Auth",
    operation_id = "resetPassword",
    summary = "Reset the caller's password",
    description = "The `email` in the body must match the email in the caller's token.",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Email does not match token (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(caller = %auth_user.email))]
pub async fn reset_password(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::new(&state.db, &state.config.auth.jwt_secret)
        .reset_password(&auth_user, &payload.email, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Caller identity", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(caller = %auth_user.email))]
pub async fn me(auth_user: AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        email: auth_user.email,
    })
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    operation_id = "authMe",
    summary = "Current user",
    description = "Alias of `GET /me`.",
    responses(
        (status = 200, description = "Caller identity", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn auth_me(auth_user: AuthUser) -> Json<UserResponse> {
    me(auth_user).await
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{debug, info};

use crate::entity::user;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::auth::{LoginResponse, RegisterRequest, validate_register_request};
use crate::utils::deadline::{LOOKUP, bounded};
use crate::utils::{hash, jwt};

/// Account registration, login and password reset.
pub struct AuthService<'a, C: ConnectionTrait> {
    conn: &'a C,
    secret: &'a str,
}

impl<'a, C: ConnectionTrait> AuthService<'a, C> {
    pub fn new(conn: &'a C, secret: &'a str) -> Self {
        Self { conn, secret }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        bounded(
            LOOKUP,
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(self.conn),
        )
        .await
    }

    /// Create an account and return its email.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<String, AppError> {
        validate_register_request(payload)?;
        let email = payload.email.trim();

        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User with this email already exists".into()));
        }

        let digest = hash::hash_password(&payload.password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;
        let now = Utc::now();
        let new_user = user::ActiveModel {
            email: Set(email.to_string()),
            password: Set(digest),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let insert = async {
            new_user.insert(self.conn).await.map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Registration race condition: unique constraint caught on insert");
                    AppError::Conflict("User with this email already exists".into())
                }
                _ => AppError::from(e),
            })
        };
        let created = bounded(LOOKUP, insert).await?;

        info!(user_id = created.id, "User registered");
        Ok(created.email)
    }

    /// Check credentials and issue a 24-hour token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".into(),
            ));
        }

        let Some(user) = self.find_by_email(email).await? else {
            debug!("Login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let matches = hash::verify_password(password, &user.password)
            .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
        if !matches {
            debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = jwt::sign(&user.email, self.secret)
            .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;
        let caller = AuthUser::from_token(&token, self.secret)?;

        Ok(LoginResponse {
            message: "Login successful".into(),
            token,
            expires_at: caller.expires_at,
        })
    }

    /// Replace the caller's own password.
    pub async fn reset_password(
        &self,
        caller: &AuthUser,
        email: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let email = email.trim();
        if email.is_empty() || new_password.is_empty() {
            return Err(AppError::Validation(
                "Email and new password are required".into(),
            ));
        }
        if caller.email != email {
            return Err(AppError::Forbidden(
                "Cannot reset password for another user".into(),
            ));
        }

        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let digest = hash::hash_password(new_password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;
        let user_id = user.id;
        let mut active: user::ActiveModel = user.into();
        active.password = Set(digest);
        active.updated_at = Set(Utc::now());
        bounded(LOOKUP, active.update(self.conn)).await?;

        info!(user_id, "Password reset");
        Ok(())
    }
}

// src/services/auth.rs

use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    models::user::User,
    store::Store,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{sign_jwt, verify_jwt},
    },
};

/// Issues and verifies bearer tokens and manages user accounts.
///
/// Holds an explicit store handle instead of a process-wide connection;
/// the same instance backs both the handlers and the auth middleware.
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    jwt_expiration: u64,
    guest_jwt_expiration: u64,
    demo_email: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration: config.jwt_expiration,
            guest_jwt_expiration: config.guest_jwt_expiration,
            demo_email: config.demo_email.clone(),
        }
    }

    /// Registers a new user and signs a session token for it.
    /// Field validation happens at the handler; the email uniqueness
    /// check is the store's constraint, so concurrent duplicates race
    /// on the database, not on a read-then-insert window.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<(User, String), AppError> {
        let hashed_password = hash_password(password)?;

        let user = self
            .store
            .create_user(email, name, &hashed_password, "user")
            .await?;

        let token = sign_jwt(user.id, &user.email, &self.jwt_secret, self.jwt_expiration)?;
        Ok((user, token))
    }

    /// Authenticates by email and password.
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        let token = sign_jwt(user.id, &user.email, &self.jwt_secret, self.jwt_expiration)?;
        Ok((user, token))
    }

    /// Logs in as the pre-seeded demo account with a shorter session.
    /// A missing demo account is a deployment defect, surfaced as 500.
    pub async fn guest_login(&self) -> Result<(User, String), AppError> {
        let user = self
            .store
            .find_user_by_email(&self.demo_email)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError("Demo account not available".to_string())
            })?;

        let token = sign_jwt(
            user.id,
            &user.email,
            &self.jwt_secret,
            self.guest_jwt_expiration,
        )?;
        Ok((user, token))
    }

    /// Verifies a bearer token and resolves it to a live user.
    /// Rejects expired, malformed or resigned tokens, and tokens whose
    /// user no longer exists.
    pub async fn verify(&self, token: &str) -> Result<User, AppError> {
        let claims = verify_jwt(token, &self.jwt_secret)?;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("User not found".to_string()))
    }

    /// Creates the demo account if it does not exist yet.
    /// Called once at startup, after migrations.
    pub async fn ensure_demo_account(&self, password: &str) -> Result<(), AppError> {
        if self.store.find_user_by_email(&self.demo_email).await?.is_none() {
            tracing::info!("Seeding demo user: {}", self.demo_email);
            let hashed_password = hash_password(password)?;
            self.store
                .create_user(&self.demo_email, "Demo User", &hashed_password, "user")
                .await?;
        }
        Ok(())
    }
}

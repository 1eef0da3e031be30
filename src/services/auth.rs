//! Authentication service: password hashing and token issuance

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{Role, User, UserClaims},
    repository::UserRepository,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Create an account with the given role.
    ///
    /// Returns `false` when the email is already registered or the store
    /// refuses the insert.
    pub async fn register(&self, email: &str, password: &str, role: Role) -> AppResult<bool> {
        if self.users.find_by_email(email).await?.is_some() {
            return Ok(false);
        }

        let mut user = User {
            id: 0,
            email: email.to_string(),
            password_hash: self.hash_password(password)?,
            role,
            crea_date: None,
        };
        self.users.create(&mut user).await
    }

    /// Check credentials and return a signed token, or `None` if they do not match
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Option<String>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };

        if !self.verify_password(&user, password)? {
            return Ok(None);
        }

        self.create_token_for_user(&user).map(Some)
    }

    /// Validate a bearer token issued by this service
    pub fn validate_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret, &self.config.jwt_issuer)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Ensure an administrator account exists
    pub async fn seed_administrator(&self, email: &str, password: &str) -> AppResult<()> {
        if self.register(email, password, Role::Administrator).await? {
            tracing::info!("Seeded administrator account {}", email);
        }
        Ok(())
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            iss: self.config.jwt_issuer.clone(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

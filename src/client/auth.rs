//! Client-side registration, login and logout

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{storage::LocalStorage, ClientResult, Endpoints, TOKEN_KEY};
use crate::models::user::TokenResponse;

/// Sign-up form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationModel {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 15))]
    pub password: String,
    #[serde(skip_serializing)]
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

/// Sign-in form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[async_trait]
pub trait AuthenticationRepository: Send + Sync {
    async fn register(&self, user: &RegistrationModel) -> ClientResult<bool>;
    /// Store the issued token on success
    async fn login(&self, login: &LoginModel) -> ClientResult<bool>;
    async fn logout(&self) -> ClientResult<()>;
}

pub struct HttpAuthenticationRepository {
    http: Client,
    storage: Arc<dyn LocalStorage>,
    endpoints: Endpoints,
}

impl HttpAuthenticationRepository {
    pub fn new(http: Client, storage: Arc<dyn LocalStorage>, endpoints: Endpoints) -> Self {
        Self {
            http,
            storage,
            endpoints,
        }
    }
}

#[async_trait]
impl AuthenticationRepository for HttpAuthenticationRepository {
    async fn register(&self, user: &RegistrationModel) -> ClientResult<bool> {
        user.validate()?;
        let response = self
            .http
            .post(self.endpoints.register())
            .json(user)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn login(&self, login: &LoginModel) -> ClientResult<bool> {
        login.validate()?;
        let response = self
            .http
            .post(self.endpoints.login())
            .json(login)
            .send()
            .await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let TokenResponse { token } = response.json().await?;
        self.storage.set_item(TOKEN_KEY, &token).await?;
        Ok(true)
    }

    async fn logout(&self) -> ClientResult<()> {
        self.storage.remove_item(TOKEN_KEY).await
    }
}

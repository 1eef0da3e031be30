//! Business logic services

pub mod auth;
pub mod logger;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

pub use logger::{LoggerService, TracingLogger};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub logger: Arc<dyn LoggerService>,
}

impl Services {
    /// Create all services with the given repository and logger
    pub fn new(repository: &Repository, auth_config: AuthConfig, logger: Arc<dyn LoggerService>) -> Self {
        Self {
            auth: auth::AuthService::new(repository.users.clone(), auth_config),
            logger,
        }
    }
}

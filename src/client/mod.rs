//! HTTP client for the bookstore API
//!
//! Repositories here mirror the server controllers: mutations answer with a
//! success flag, reads with an optional entity. The bearer token issued at
//! login is kept in a [`storage::LocalStorage`] and attached to every call.

pub mod auth;
pub mod repository;
pub mod storage;

use thiserror::Error;

use crate::models::{AuthorDto, BookDto};

pub use auth::{AuthenticationRepository, HttpAuthenticationRepository, LoginModel, RegistrationModel};
pub use repository::HttpRepository;
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Storage key holding the session token
pub const TOKEN_KEY: &str = "authToken";

pub type AuthorClient = HttpRepository<AuthorDto>;
pub type BookClient = HttpRepository<BookDto>;

/// Client-side error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Resource URLs derived from the server base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn authors(&self) -> String {
        format!("{}/api/authors", self.base_url)
    }

    pub fn books(&self) -> String {
        format!("{}/api/books", self.base_url)
    }

    pub fn register(&self) -> String {
        format!("{}/api/users/register", self.base_url)
    }

    pub fn login(&self) -> String {
        format!("{}/api/users/login", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8080/");
        assert_eq!(endpoints.authors(), "http://localhost:8080/api/authors");
        assert_eq!(endpoints.books(), "http://localhost:8080/api/books");
        assert_eq!(endpoints.login(), "http://localhost:8080/api/users/login");
        assert_eq!(endpoints.register(), "http://localhost:8080/api/users/register");
    }
}

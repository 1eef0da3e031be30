//! API handlers for the bookstore REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use std::future::Future;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult, INTERNAL_ERROR_MESSAGE},
    models::UserClaims,
    services::LoggerService,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or malformed bearer token".to_string()))?;

        let claims = state.services.auth.validate_token(bearer.token())?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for an authenticated user holding the Administrator role
pub struct AdministratorUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdministratorUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_administrator()?;
        Ok(AdministratorUser(claims))
    }
}

/// Run a controller action, turning any escaped error into a logged 500
pub(crate) async fn guarded<F>(logger: &dyn LoggerService, action: F) -> Response
where
    F: Future<Output = AppResult<Response>>,
{
    match action.await {
        Ok(response) => response,
        Err(e) => internal_error(logger, &e.describe()),
    }
}

/// Log `message` and answer with the generic 500 body
pub(crate) fn internal_error(logger: &dyn LoggerService, message: &str) -> Response {
    logger.log_error(message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(INTERNAL_ERROR_MESSAGE)).into_response()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health::health_check))
        // Accounts
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        // Authors
        .route(
            "/authors",
            get(authors::get_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::get_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! Account endpoints: registration and login

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        user::{LoginDto, RegisterDto, RegisterResponse, TokenResponse},
        Role,
    },
    services::LoggerService,
    AppState,
};

use super::{guarded, internal_error};

/// Register a customer account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterDto,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing or invalid body"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Option<Json<RegisterDto>>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, register_account(&state, logger, body)).await
}

async fn register_account(
    state: &AppState,
    logger: &dyn LoggerService,
    body: Option<Json<RegisterDto>>,
) -> AppResult<Response> {
    logger.log_info("Registration attempted");
    let Some(Json(dto)) = body else {
        logger.log_warn("Empty request was submitted");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    if let Err(errors) = dto.validate() {
        logger.log_warn("Registration data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    let created = state
        .services
        .auth
        .register(&dto.email, &dto.password, Role::Customer)
        .await?;
    if !created {
        return Ok(internal_error(
            logger,
            &format!("{} user registration attempt failed", dto.email),
        ));
    }
    logger.log_info(&format!("{} registered", dto.email));
    Ok(Json(RegisterResponse { succeeded: true }).into_response())
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing or invalid body"),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn login(State(state): State<AppState>, body: Option<Json<LoginDto>>) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, log_in(&state, logger, body)).await
}

async fn log_in(
    state: &AppState,
    logger: &dyn LoggerService,
    body: Option<Json<LoginDto>>,
) -> AppResult<Response> {
    let Some(Json(dto)) = body else {
        logger.log_warn("Empty request was submitted");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    logger.log_info(&format!("Login attempt from user {}", dto.email));
    if let Err(errors) = dto.validate() {
        logger.log_warn("Login data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    match state.services.auth.login(&dto.email, &dto.password).await? {
        Some(token) => {
            logger.log_info(&format!("{} successfully authenticated", dto.email));
            Ok(Json(TokenResponse { token }).into_response())
        }
        None => {
            logger.log_warn(&format!("{} not authenticated", dto.email));
            Ok(StatusCode::UNAUTHORIZED.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tracing::Level;

    use crate::{
        api::testing::{app_state, send},
        error::INTERNAL_ERROR_MESSAGE,
        repository::Repository,
    };

    #[tokio::test]
    async fn register_then_login_returns_token() {
        let (state, _) = app_state(Repository::in_memory());
        let credentials = json!({"email": "reader@bookstore.com", "password": "secret1"});

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/users/register",
            None,
            Some(credentials.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["succeeded"], true);

        let (status, body) =
            send(&state, Method::POST, "/api/users/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();
        assert!(state.services.auth.validate_token(token).is_ok());
    }

    #[tokio::test]
    async fn duplicate_registration_is_500_and_logged() {
        let (state, logger) = app_state(Repository::in_memory());
        let credentials = json!({"email": "reader@bookstore.com", "password": "secret1"});

        send(&state, Method::POST, "/api/users/register", None, Some(credentials.clone())).await;
        let (status, body) =
            send(&state, Method::POST, "/api/users/register", None, Some(credentials)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!(INTERNAL_ERROR_MESSAGE));
        assert_eq!(
            logger.messages_at(Level::ERROR),
            vec!["reader@bookstore.com user registration attempt failed"]
        );
    }

    #[tokio::test]
    async fn short_password_is_400() {
        let (state, _) = app_state(Repository::in_memory());
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({"email": "reader@bookstore.com", "password": "abc"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("password").is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let (state, _) = app_state(Repository::in_memory());
        send(
            &state,
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({"email": "reader@bookstore.com", "password": "secret1"})),
        )
        .await;

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"email": "reader@bookstore.com", "password": "secret2"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

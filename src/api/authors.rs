//! Authors endpoints
//!
//! Every handler runs inside [`guarded`], so a store error becomes a logged
//! 500 with the generic message while validation and lookup failures map to
//! 400 and 404.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorCreateDto, AuthorDto, AuthorUpdateDto, CreatedAuthor},
    services::LoggerService,
    AppState,
};

use super::{guarded, internal_error, AdministratorUser, AuthenticatedUser};

/// Get all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All authors with their books", body = Vec<AuthorDto>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, list(&state, logger)).await
}

async fn list(state: &AppState, logger: &dyn LoggerService) -> AppResult<Response> {
    logger.log_info("Attempted Get All Authors");
    let authors = state.repository.authors.find_all().await?;
    let response: Vec<AuthorDto> = authors.into_iter().map(AuthorDto::from).collect();
    logger.log_info("Successfully got all Authors");
    Ok(Json(response).into_response())
}

/// Get an author by id
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author record", body = AuthorDto),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, find(&state, logger, id)).await
}

async fn find(state: &AppState, logger: &dyn LoggerService, id: i32) -> AppResult<Response> {
    logger.log_info(&format!("Attempted to get author with id: {}", id));
    let Some(author) = state.repository.authors.find_by_id(id).await? else {
        logger.log_warn(&format!("Author with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    logger.log_info(&format!("Successfully got author with id: {}", id));
    Ok(Json(AuthorDto::from(author)).into_response())
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorCreateDto,
    responses(
        (status = 201, description = "Author created", body = CreatedAuthor),
        (status = 400, description = "Missing or invalid body"),
        (status = 403, description = "Administrator role required"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    body: Option<Json<AuthorCreateDto>>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, create(&state, logger, body)).await
}

async fn create(
    state: &AppState,
    logger: &dyn LoggerService,
    body: Option<Json<AuthorCreateDto>>,
) -> AppResult<Response> {
    logger.log_info("Author submission attempted");
    let Some(Json(dto)) = body else {
        logger.log_warn("Empty request was submitted");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    if let Err(errors) = dto.validate() {
        logger.log_warn("Author data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    let mut author = Author::from(dto);
    if !state.repository.authors.create(&mut author).await? {
        return Ok(internal_error(logger, "Author creation failed"));
    }
    logger.log_info(&format!("Author created - id: {}", author.id));

    let location = format!("/api/authors/{}", author.id);
    let body = CreatedAuthor {
        author: AuthorDto::from(author),
    };
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorUpdateDto,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Bad id, missing body, id mismatch or invalid body"),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    Path(id): Path<i32>,
    body: Option<Json<AuthorUpdateDto>>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, update(&state, logger, id, body)).await
}

async fn update(
    state: &AppState,
    logger: &dyn LoggerService,
    id: i32,
    body: Option<Json<AuthorUpdateDto>>,
) -> AppResult<Response> {
    logger.log_info(&format!("Author update attempted - id: {}", id));
    let dto = match body {
        Some(Json(dto)) if id >= 1 && dto.id == id => dto,
        _ => {
            logger.log_warn("Author update failed with bad data");
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    if !state.repository.authors.is_exists(id).await? {
        logger.log_warn(&format!("Author with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    if let Err(errors) = dto.validate() {
        logger.log_warn("Author data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    let author = Author::from(dto);
    if !state.repository.authors.update(&author).await? {
        return Ok(internal_error(logger, "Update operation failed"));
    }
    logger.log_info(&format!("Author id: {} successfully updated", id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Bad id"),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    Path(id): Path<i32>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, delete(&state, logger, id)).await
}

async fn delete(state: &AppState, logger: &dyn LoggerService, id: i32) -> AppResult<Response> {
    logger.log_info(&format!("Author delete attempted - id: {}", id));
    if id < 1 {
        logger.log_warn("Author delete failed with bad data");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    }

    if !state.repository.authors.is_exists(id).await? {
        logger.log_warn(&format!("Author with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    // Gone between the probe and the fetch
    let Some(author) = state.repository.authors.find_by_id(id).await? else {
        logger.log_warn(&format!("Author with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    if !state.repository.authors.delete(&author).await? {
        return Ok(internal_error(logger, "Author delete failed"));
    }
    logger.log_info(&format!("Author id: {} successfully deleted", id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

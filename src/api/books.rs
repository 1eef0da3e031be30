//! Books endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookCreateDto, BookDto, BookUpdateDto, CreatedBook},
    services::LoggerService,
    AppState,
};

use super::{guarded, internal_error, AdministratorUser, AuthenticatedUser};

/// Get all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books with their author", body = Vec<BookDto>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, list(&state, logger)).await
}

async fn list(state: &AppState, logger: &dyn LoggerService) -> AppResult<Response> {
    logger.log_info("Attempted Get All Books");
    let books = state.repository.books.find_all().await?;
    let response: Vec<BookDto> = books.into_iter().map(BookDto::from).collect();
    logger.log_info("Successfully got all Books");
    Ok(Json(response).into_response())
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book record", body = BookDto),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, find(&state, logger, id)).await
}

async fn find(state: &AppState, logger: &dyn LoggerService, id: i32) -> AppResult<Response> {
    logger.log_info(&format!("Attempted to get book with id: {}", id));
    let Some(book) = state.repository.books.find_by_id(id).await? else {
        logger.log_warn(&format!("Book with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    logger.log_info(&format!("Successfully got book with id: {}", id));
    Ok(Json(BookDto::from(book)).into_response())
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookCreateDto,
    responses(
        (status = 201, description = "Book created", body = CreatedBook),
        (status = 400, description = "Missing or invalid body"),
        (status = 403, description = "Administrator role required"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    body: Option<Json<BookCreateDto>>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, create(&state, logger, body)).await
}

async fn create(
    state: &AppState,
    logger: &dyn LoggerService,
    body: Option<Json<BookCreateDto>>,
) -> AppResult<Response> {
    logger.log_info("Book submission attempted");
    let Some(Json(dto)) = body else {
        logger.log_warn("Empty request was submitted");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    if let Err(errors) = dto.validate() {
        logger.log_warn("Book data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    let mut book = Book::from(dto);
    if !state.repository.books.create(&mut book).await? {
        return Ok(internal_error(logger, "Book creation failed"));
    }
    logger.log_info(&format!("Book created - id: {}", book.id));

    let location = format!("/api/books/{}", book.id);
    let body = CreatedBook {
        book: BookDto::from(book),
    };
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookUpdateDto,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Bad id, missing body, id mismatch or invalid body"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    Path(id): Path<i32>,
    body: Option<Json<BookUpdateDto>>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, update(&state, logger, id, body)).await
}

async fn update(
    state: &AppState,
    logger: &dyn LoggerService,
    id: i32,
    body: Option<Json<BookUpdateDto>>,
) -> AppResult<Response> {
    logger.log_info(&format!("Book update attempted - id: {}", id));
    let dto = match body {
        Some(Json(dto)) if id >= 1 && dto.id == id => dto,
        _ => {
            logger.log_warn("Book update failed with bad data");
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    if !state.repository.books.is_exists(id).await? {
        logger.log_warn(&format!("Book with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    if let Err(errors) = dto.validate() {
        logger.log_warn("Book data was incomplete");
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }

    let book = Book::from(dto);
    if !state.repository.books.update(&book).await? {
        return Ok(internal_error(logger, "Update operation failed"));
    }
    logger.log_info(&format!("Book id: {} successfully updated", id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Bad id"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AdministratorUser(_claims): AdministratorUser,
    Path(id): Path<i32>,
) -> Response {
    let logger = state.services.logger.as_ref();
    guarded(logger, delete(&state, logger, id)).await
}

async fn delete(state: &AppState, logger: &dyn LoggerService, id: i32) -> AppResult<Response> {
    logger.log_info(&format!("Book delete attempted - id: {}", id));
    if id < 1 {
        logger.log_warn("Book delete failed with bad data");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    }

    if !state.repository.books.is_exists(id).await? {
        logger.log_warn(&format!("Book with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let Some(book) = state.repository.books.find_by_id(id).await? else {
        logger.log_warn(&format!("Book with id: {} was not found", id));
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    if !state.repository.books.delete(&book).await? {
        return Ok(internal_error(logger, "Book delete failed"));
    }
    logger.log_info(&format!("Book id: {} successfully deleted", id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::{
        api::testing::{app_state, mocked, send, send_with_headers, token},
        error::{AppError, INTERNAL_ERROR_MESSAGE},
        models::{Author, Book, Role},
        repository::{
            authors::MockAuthorRepository, books::MockBookRepository, users::MockUserRepository,
        },
    };

    fn with_books(
        books: MockBookRepository,
    ) -> (crate::AppState, std::sync::Arc<crate::services::logger::RecordingLogger>) {
        app_state(mocked(
            MockAuthorRepository::new(),
            books,
            MockUserRepository::new(),
        ))
    }

    fn stored(id: i32) -> Book {
        Book {
            id,
            title: "The Left Hand of Darkness".to_string(),
            isbn: "978-0441478125".to_string(),
            author_id: Some(2),
            author: Some(Author {
                id: 2,
                firstname: "Ursula".to_string(),
                lastname: "Le Guin".to_string(),
                ..Author::default()
            }),
            ..Book::default()
        }
    }

    fn update_body(id: i32) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Revised",
            "isbn": "978-0441478125",
            "author_id": 2
        })
    }

    #[tokio::test]
    async fn get_book_includes_author() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stored(id))));
        let (state, _) = with_books(books);
        let token = token(&state, Role::Customer);

        let (status, body) = send(&state, Method::GET, "/api/books/3", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
        assert_eq!(body["author"]["lastname"], "Le Guin");
    }

    #[tokio::test]
    async fn get_book_store_error_is_500() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));
        let (state, logger) = with_books(books);
        let token = token(&state, Role::Customer);

        let (status, body) = send(&state, Method::GET, "/api/books/3", Some(&token), None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!(INTERNAL_ERROR_MESSAGE));
        assert_eq!(
            logger.messages_at(tracing::Level::ERROR),
            vec!["Internal server error: connection reset - "]
        );
    }

    #[tokio::test]
    async fn create_rejects_missing_author_reference() {
        let (state, _) = with_books(MockBookRepository::new());
        let token = token(&state, Role::Administrator);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/books",
            Some(&token),
            Some(json!({"title": "Orphan", "isbn": "123"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("author_id").is_some());
    }

    #[tokio::test]
    async fn create_with_null_author_reports_validation_errors() {
        let (state, logger) = with_books(MockBookRepository::new());
        let token = token(&state, Role::Administrator);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/books",
            Some(&token),
            Some(json!({"title": "Orphan", "isbn": "123", "author_id": null})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("author_id").is_some());
        assert_eq!(
            logger.messages_at(tracing::Level::WARN),
            vec!["Book data was incomplete"]
        );
    }

    #[tokio::test]
    async fn create_returns_location_and_body() {
        let mut books = MockBookRepository::new();
        books.expect_create().returning(|book| {
            book.id = 17;
            Ok(true)
        });
        let (state, _) = with_books(books);
        let token = token(&state, Role::Administrator);

        let (status, headers, body) = send_with_headers(
            &state,
            Method::POST,
            "/api/books",
            Some(&token),
            Some(json!({"title": "Lathe of Heaven", "isbn": "978-1416556961", "author_id": 2, "price": 12.5})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[header::LOCATION], "/api/books/17");
        assert_eq!(body["book"]["id"], 17);
        assert_eq!(body["book"]["author_id"], 2);
        assert_eq!(body["book"]["price"], 12.5);
    }

    #[tokio::test]
    async fn update_mismatch_is_400_without_store_access() {
        let (state, _) = with_books(MockBookRepository::new());
        let token = token(&state, Role::Administrator);

        let (status, _) = send(
            &state,
            Method::PUT,
            "/api/books/5",
            Some(&token),
            Some(update_body(6)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_missing_book_is_404() {
        let mut books = MockBookRepository::new();
        books.expect_is_exists().returning(|_| Ok(false));
        books.expect_update().never();
        let (state, _) = with_books(books);
        let token = token(&state, Role::Administrator);

        let (status, _) = send(
            &state,
            Method::PUT,
            "/api/books/5",
            Some(&token),
            Some(update_body(5)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_success_is_204() {
        let mut books = MockBookRepository::new();
        books.expect_is_exists().returning(|_| Ok(true));
        books
            .expect_update()
            .withf(|b: &Book| b.id == 5 && b.title == "Revised")
            .returning(|_| Ok(true));
        let (state, _) = with_books(books);
        let token = token(&state, Role::Administrator);

        let (status, _) = send(
            &state,
            Method::PUT,
            "/api/books/5",
            Some(&token),
            Some(update_body(5)),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_zero_is_400() {
        let (state, _) = with_books(MockBookRepository::new());
        let token = token(&state, Role::Administrator);

        let (status, _) = send(&state, Method::DELETE, "/api/books/0", Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_success_is_204() {
        let mut books = MockBookRepository::new();
        books.expect_is_exists().returning(|_| Ok(true));
        books
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id))));
        books
            .expect_delete()
            .withf(|b: &Book| b.id == 9)
            .times(1)
            .returning(|_| Ok(true));
        let (state, _) = with_books(books);
        let token = token(&state, Role::Administrator);

        let (status, _) = send(&state, Method::DELETE, "/api/books/9", Some(&token), None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

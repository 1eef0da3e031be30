//! Book entity, transport shapes and the mapping between them

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::{Author, AuthorDto};

/// Book row as stored in the database
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: Option<i32>,
    /// Owning author, loaded separately
    #[sqlx(skip)]
    pub author: Option<Author>,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorDto>,
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookCreateDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, max = 32))]
    pub isbn: String,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(required, range(min = 1))]
    pub author_id: Option<i32>,
}

/// Update book request; `id` must match the path
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookUpdateDto {
    pub id: i32,
    #[serde(default)]
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, max = 32))]
    pub isbn: String,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(required, range(min = 1))]
    pub author_id: Option<i32>,
}

/// Body of a successful create
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedBook {
    pub book: BookDto,
}

impl From<BookCreateDto> for Book {
    fn from(dto: BookCreateDto) -> Self {
        Self {
            id: 0,
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            price: dto.price,
            author_id: dto.author_id,
            author: None,
        }
    }
}

impl From<BookUpdateDto> for Book {
    fn from(dto: BookUpdateDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            price: dto.price,
            author_id: dto.author_id,
            author: None,
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            price: book.price,
            author_id: book.author_id,
            author: book.author.map(AuthorDto::from),
        }
    }
}

//! Author entity, transport shapes and the mapping between them

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::{Book, BookDto};

/// Author row as stored in the database
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Author {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub bio: Option<String>,
    /// Books written by this author, loaded separately
    #[sqlx(skip)]
    pub books: Vec<Book>,
}

/// Author as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub books: Vec<BookDto>,
}

/// Create author request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorCreateDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub firstname: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub lastname: String,
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// Update author request; `id` must match the path
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorUpdateDto {
    pub id: i32,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub firstname: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub lastname: String,
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// Body of a successful create
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedAuthor {
    pub author: AuthorDto,
}

impl From<AuthorCreateDto> for Author {
    fn from(dto: AuthorCreateDto) -> Self {
        Self {
            id: 0,
            firstname: dto.firstname,
            lastname: dto.lastname,
            bio: dto.bio,
            books: Vec::new(),
        }
    }
}

impl From<AuthorUpdateDto> for Author {
    fn from(dto: AuthorUpdateDto) -> Self {
        Self {
            id: dto.id,
            firstname: dto.firstname,
            lastname: dto.lastname,
            bio: dto.bio,
            books: Vec::new(),
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            firstname: author.firstname,
            lastname: author.lastname,
            bio: author.bio,
            books: author.books.into_iter().map(BookDto::from).collect(),
        }
    }
}

//! Data models for the bookstore

pub mod author;
pub mod book;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorCreateDto, AuthorDto, AuthorUpdateDto};
pub use book::{Book, BookCreateDto, BookDto, BookUpdateDto};
pub use user::{Role, User, UserClaims};

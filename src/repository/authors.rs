//! Authors repository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::books::BOOK_COLUMNS;
use crate::{
    error::AppResult,
    models::{Author, Book},
};

/// Data access for authors
///
/// Mutations report success as a flag; `Err` is reserved for store failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors with their books
    async fn find_all(&self) -> AppResult<Vec<Author>>;

    /// One author with its books
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>>;

    async fn is_exists(&self, id: i32) -> AppResult<bool>;

    /// Insert the author and assign its new id
    async fn create(&self, author: &mut Author) -> AppResult<bool>;

    async fn update(&self, author: &Author) -> AppResult<bool>;

    async fn delete(&self, author: &Author) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn books_of(&self, author_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Book>>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author_id = ANY($1) ORDER BY id",
            BOOK_COLUMNS
        ))
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_author: HashMap<i32, Vec<Book>> = HashMap::new();
        for book in books {
            if let Some(author_id) = book.author_id {
                by_author.entry(author_id).or_default().push(book);
            }
        }
        Ok(by_author)
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let mut authors = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname, bio FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = authors.iter().map(|a| a.id).collect();
        let mut books = self.books_of(&ids).await?;
        for author in &mut authors {
            author.books = books.remove(&author.id).unwrap_or_default();
        }
        Ok(authors)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname, bio FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match author {
            Some(mut author) => {
                author.books = self.books_of(&[id]).await?.remove(&id).unwrap_or_default();
                Ok(Some(author))
            }
            None => Ok(None),
        }
    }

    async fn is_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, author: &mut Author) -> AppResult<bool> {
        let id: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO authors (firstname, lastname, bio)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&author.firstname)
        .bind(&author.lastname)
        .bind(&author.bio)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match id {
            Some(id) => {
                author.id = id;
                true
            }
            None => false,
        })
    }

    async fn update(&self, author: &Author) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE authors SET firstname = $1, lastname = $2, bio = $3 WHERE id = $4",
        )
        .bind(&author.firstname)
        .bind(&author.lastname)
        .bind(&author.bio)
        .bind(author.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, author: &Author) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(author.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

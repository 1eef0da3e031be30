//! Books repository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Author, Book},
};

pub(crate) const BOOK_COLUMNS: &str =
    "id, title, year, isbn, summary, image, price, author_id";

/// Data access for books
///
/// Mutations report success as a flag; `Err` is reserved for store failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books with their author
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// One book with its author
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn is_exists(&self, id: i32) -> AppResult<bool>;

    /// Insert the book and assign its new id
    async fn create(&self, book: &mut Book) -> AppResult<bool>;

    async fn update(&self, book: &Book) -> AppResult<bool>;

    async fn delete(&self, book: &Book) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn authors_by_id(&self, ids: &[i32]) -> AppResult<HashMap<i32, Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname, bio FROM authors WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut ids: Vec<i32> = books.iter().filter_map(|b| b.author_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let authors = self.authors_by_id(&ids).await?;
        for book in &mut books {
            book.author = book.author_id.and_then(|id| authors.get(&id).cloned());
        }
        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut book) = book else {
            return Ok(None);
        };
        if let Some(author_id) = book.author_id {
            book.author = self.authors_by_id(&[author_id]).await?.remove(&author_id);
        }
        Ok(Some(book))
    }

    async fn is_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, book: &mut Book) -> AppResult<bool> {
        let id: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, year, isbn, summary, image, price, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(&book.summary)
        .bind(&book.image)
        .bind(book.price)
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match id {
            Some(id) => {
                book.id = id;
                true
            }
            None => false,
        })
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, year = $2, isbn = $3, summary = $4, image = $5, price = $6, author_id = $7
            WHERE id = $8
            "#,
        )
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(&book.summary)
        .bind(&book.image)
        .bind(book.price)
        .bind(book.author_id)
        .bind(book.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, book: &Book) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

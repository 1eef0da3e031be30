//! Repository layer for database operations
//!
//! Each resource is reached through a trait so controllers can run against
//! PostgreSQL, the in-process [`memory`] store, or a mock in tests.

pub mod authors;
pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::{AuthorRepository, PgAuthorRepository};
pub use books::{BookRepository, PgBookRepository};
pub use users::{PgUserRepository, UserRepository};

/// Handles to every resource repository
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repository {
    /// Create PostgreSQL-backed repositories sharing the given pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgAuthorRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }

    /// Create repositories over a fresh in-process store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            authors: Arc::new(memory::MemoryAuthorRepository::new(store.clone())),
            books: Arc::new(memory::MemoryBookRepository::new(store.clone())),
            users: Arc::new(memory::MemoryUserRepository::new(store)),
        }
    }
}

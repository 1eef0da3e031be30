//! In-process store implementing every repository trait
//!
//! Mirrors the relational constraints of the PostgreSQL schema: unique
//! book ISBNs and user emails, books referencing an existing author, and
//! `ON DELETE SET NULL` from authors to their books.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorRepository, BookRepository, UserRepository};
use crate::{
    error::AppResult,
    models::{Author, Book, User},
};

#[derive(Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    users: BTreeMap<i32, User>,
    next_author_id: i32,
    next_book_id: i32,
    next_user_id: i32,
}

impl Tables {
    fn author_with_books(&self, author: &Author) -> Author {
        let mut author = author.clone();
        author.books = self
            .books
            .values()
            .filter(|b| b.author_id == Some(author.id))
            .cloned()
            .collect();
        author
    }

    fn book_with_author(&self, book: &Book) -> Book {
        let mut book = book.clone();
        book.author = book.author_id.and_then(|id| self.authors.get(&id).cloned());
        book
    }

    fn book_is_consistent(&self, book: &Book) -> bool {
        let author_ok = book.author_id.map_or(true, |id| self.authors.contains_key(&id));
        let isbn_free = !self
            .books
            .values()
            .any(|other| other.id != book.id && other.isbn == book.isbn);
        author_ok && isbn_free
    }
}

/// Shared tables behind the in-process repositories
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

pub struct MemoryAuthorRepository {
    store: MemoryStore,
}

impl MemoryAuthorRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthorRepository for MemoryAuthorRepository {
    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .authors
            .values()
            .map(|a| tables.author_with_books(a))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.get(&id).map(|a| tables.author_with_books(a)))
    }

    async fn is_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.store.tables.read().await.authors.contains_key(&id))
    }

    async fn create(&self, author: &mut Author) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        tables.next_author_id += 1;
        author.id = tables.next_author_id;

        let mut row = author.clone();
        row.books.clear();
        tables.authors.insert(row.id, row);
        Ok(true)
    }

    async fn update(&self, author: &Author) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        match tables.authors.get_mut(&author.id) {
            Some(row) => {
                row.firstname = author.firstname.clone();
                row.lastname = author.lastname.clone();
                row.bio = author.bio.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, author: &Author) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        if tables.authors.remove(&author.id).is_none() {
            return Ok(false);
        }
        for book in tables.books.values_mut() {
            if book.author_id == Some(author.id) {
                book.author_id = None;
            }
        }
        Ok(true)
    }
}

pub struct MemoryBookRepository {
    store: MemoryStore,
}

impl MemoryBookRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .books
            .values()
            .map(|b| tables.book_with_author(b))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let tables = self.store.tables.read().await;
        Ok(tables.books.get(&id).map(|b| tables.book_with_author(b)))
    }

    async fn is_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.store.tables.read().await.books.contains_key(&id))
    }

    async fn create(&self, book: &mut Book) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        if !tables.book_is_consistent(book) {
            return Ok(false);
        }
        tables.next_book_id += 1;
        book.id = tables.next_book_id;

        let mut row = book.clone();
        row.author = None;
        tables.books.insert(row.id, row);
        Ok(true)
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        if !tables.books.contains_key(&book.id) || !tables.book_is_consistent(book) {
            return Ok(false);
        }
        let mut row = book.clone();
        row.author = None;
        tables.books.insert(row.id, row);
        Ok(true)
    }

    async fn delete(&self, book: &Book) -> AppResult<bool> {
        Ok(self.store.tables.write().await.books.remove(&book.id).is_some())
    }
}

pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: &mut User) -> AppResult<bool> {
        let mut tables = self.store.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Ok(false);
        }
        tables.next_user_id += 1;
        user.id = tables.next_user_id;
        user.crea_date = Some(chrono::Utc::now());
        tables.users.insert(user.id, user.clone());
        Ok(true)
    }
}

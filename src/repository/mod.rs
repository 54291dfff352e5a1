//! Repository layer for book persistence

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookSummary},
};

/// Message reported when the (title, author) uniqueness rule is violated
pub const DUPLICATE_BOOK: &str = "A book with the same title and author already exists";

/// Persistence operations over book records.
///
/// Every implementation must enforce (title, author) uniqueness itself, so that
/// concurrent writers racing past the service-level check still get a
/// `Conflict` instead of a duplicate row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, oldest first
    async fn list_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Whether a book other than `exclude_id` carries this exact (title, author) pair
    async fn exists_by_title_author(
        &self,
        title: &str,
        author: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool>;

    async fn insert(&self, book: &Book) -> AppResult<()>;

    /// Overwrite the stored record with the same id
    async fn update(&self, book: &Book) -> AppResult<()>;

    async fn delete(&self, book: &Book) -> AppResult<()>;

    /// Books whose title or author contains `text`, ordered by title, with the
    /// total match count before pagination
    async fn query_by_title_or_author(
        &self,
        text: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)>;

    /// Connectivity probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the configured book store
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// Repository backed by PostgreSQL through the given pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(Arc::new(books::PgBookStore::new(pool)))
    }

    /// Process-local repository, empty at start
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryBookStore::new()))
    }
}

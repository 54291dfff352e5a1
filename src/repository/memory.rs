//! In-memory book store, used for local runs and tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, DUPLICATE_BOOK};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookSummary},
};

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<Uuid, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn collides(books: &HashMap<Uuid, Book>, title: &str, author: &str, exclude_id: Option<Uuid>) -> bool {
    books
        .values()
        .any(|b| Some(b.id) != exclude_id && b.title == title && b.author == author)
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        let mut all: Vec<Book> = books.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn exists_by_title_author(
        &self,
        title: &str,
        author: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        Ok(collides(&*self.books.read().await, title, author, exclude_id))
    }

    async fn insert(&self, book: &Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.id) {
            return Err(AppError::Internal(format!("Book id {} already in use", book.id)));
        }
        if collides(&books, &book.title, &book.author, None) {
            return Err(AppError::Conflict(DUPLICATE_BOOK.to_string()));
        }
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        if !books.contains_key(&book.id) {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }
        if collides(&books, &book.title, &book.author, Some(book.id)) {
            return Err(AppError::Conflict(DUPLICATE_BOOK.to_string()));
        }
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        self.books
            .write()
            .await
            .remove(&book.id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book.id)))
    }

    async fn query_by_title_or_author(
        &self,
        text: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        let books = self.books.read().await;
        let mut matches: Vec<&Book> = books
            .values()
            .filter(|b| b.title.contains(text) || b.author.contains(text))
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let total = matches.len() as i64;
        let items = matches
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(BookSummary::from)
            .collect();
        Ok((items, total))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

//! Book inventory service: creation, partial updates, search and removal

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{
        has_nul, Book, BookPatch, NewBook, SearchPage, SearchQuery, NAME_MAX_LEN, NAME_MIN_LEN,
    },
    repository::{BookStore, DUPLICATE_BOOK},
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.store.list_all().await
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    /// Create a book. The (title, author) pair must be new.
    pub async fn create_book(&self, data: NewBook) -> AppResult<Book> {
        data.validate()?;

        if self
            .store
            .exists_by_title_author(&data.title, &data.author, None)
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_BOOK.to_string()));
        }

        let book = Book {
            id: Uuid::new_v4(),
            title: data.title,
            author: data.author,
            genre: data.genre,
            price: data.price,
            stock: data.stock,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.store.insert(&book).await?;

        tracing::info!("Book created: id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Apply a sparse patch to an existing book.
    ///
    /// The duplicate check runs against the final (title, author) pair, and
    /// nothing is written unless every field of the patch is acceptable.
    pub async fn update_book(&self, id: Uuid, patch: BookPatch) -> AppResult<()> {
        let existing = self.get_book(id).await?;

        let (title, author) = resolve_identity(&existing, &patch)?;
        if self
            .store
            .exists_by_title_author(&title, &author, Some(id))
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_BOOK.to_string()));
        }

        let updated = apply_patch(existing, title, author, &patch, Utc::now())?;
        self.store.update(&updated).await?;

        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        let book = self.get_book(id).await?;
        self.store.delete(&book).await?;

        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Search title/author by substring, one page at a time.
    ///
    /// An empty page is reported as `NotFound`, including a page past the end
    /// of an otherwise matching search.
    pub async fn search_books(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let text = query
            .valor
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation("A search value is required".to_string()))?;
        if has_nul(text) {
            return Err(AppError::Validation(
                "valor: must not contain NUL characters".to_string(),
            ));
        }

        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page <= 0 || page_size <= 0 {
            return Err(AppError::Validation(
                "page and pageSize must be greater than zero".to_string(),
            ));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| AppError::Validation("page is out of range".to_string()))?;

        let (items, total_items) = self
            .store
            .query_by_title_or_author(text, offset, page_size)
            .await?;

        tracing::debug!(
            "Book search {:?}: page={} page_size={} total={}",
            text,
            page,
            page_size,
            total_items
        );

        if items.is_empty() {
            return Err(AppError::NotFound("No books found".to_string()));
        }

        Ok(SearchPage {
            page,
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
            items,
        })
    }

    /// Storage connectivity check for readiness probes
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}

fn book_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

/// Ceiling division; `page_size` may be as large as `i64::MAX`
fn total_pages(total_items: i64, page_size: i64) -> i64 {
    total_items / page_size + i64::from(total_items % page_size != 0)
}

/// Trimmed replacement if the patch carries a non-blank value, else the current one
fn pick_name(current: &str, replacement: Option<&str>, field: &str) -> AppResult<String> {
    let candidate = match replacement.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(current.to_string()),
    };

    if has_nul(candidate) {
        return Err(AppError::Validation(format!(
            "{}: must not contain NUL characters",
            field
        )));
    }

    let len = candidate.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "{}: must be between {} and {} characters",
            field, NAME_MIN_LEN, NAME_MAX_LEN
        )));
    }
    Ok(candidate.to_string())
}

/// The (title, author) pair the book will carry once the patch is applied
pub fn resolve_identity(existing: &Book, patch: &BookPatch) -> AppResult<(String, String)> {
    let title = pick_name(&existing.title, patch.title.as_deref(), "title")?;
    let author = pick_name(&existing.author, patch.author.as_deref(), "author")?;
    Ok((title, author))
}

/// Next state of `book` after the patch; fails without touching storage
pub fn apply_patch(
    mut book: Book,
    title: String,
    author: String,
    patch: &BookPatch,
    now: DateTime<Utc>,
) -> AppResult<Book> {
    book.title = title;
    book.author = author;

    if let Some(genre) = patch.genre {
        book.genre = genre;
    }

    if let Some(price) = patch.price {
        if price < Decimal::ZERO {
            return Err(AppError::Validation("price: cannot be negative".to_string()));
        }
        book.price = price;
    }

    if let Some(stock) = patch.stock {
        if stock < 0 {
            return Err(AppError::Validation("stock: cannot be negative".to_string()));
        }
        book.stock = stock;
    }

    book.updated_at = Some(now);
    Ok(book)
}

//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{BookStore, DUPLICATE_BOOK};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookSummary},
};

/// Escapes LIKE metacharacters so `text` is matched literally (escape char `\`)
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Unique violations become `Conflict`; everything else stays a storage error
fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_BOOK.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, price, stock, created_at, updated_at
            FROM books
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, price, stock, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn exists_by_title_author(
        &self,
        title: &str,
        author: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM books
                WHERE title = $1 AND author = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, genre, price, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(book.price)
        .bind(book.stock)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, genre = $4, price = $5, stock = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(book.price)
        .bind(book.stock)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }
        Ok(())
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }
        Ok(())
    }

    async fn query_by_title_or_author(
        &self,
        text: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        let pattern = format!("%{}%", escape_like(text));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books
            WHERE title LIKE $1 ESCAPE '\' OR author LIKE $1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT title, genre, price, stock FROM books
            WHERE title LIKE $1 ESCAPE '\' OR author LIKE $1 ESCAPE '\'
            ORDER BY title COLLATE "C", id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

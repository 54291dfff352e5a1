//! Book model and related request/response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::enums::BookGenre;

/// Minimum length (in characters) of a title or author
pub const NAME_MIN_LEN: usize = 2;
/// Maximum length (in characters) of a title or author
pub const NAME_MAX_LEN: usize = 120;

/// Full book record (DB + API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: BookGenre,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Search projection: the catalog view of a book without identity or timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub title: String,
    pub genre: BookGenre,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            genre: book.genre,
            price: book.price,
            stock: book.stock,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    #[validate(
        length(min = 2, max = 120, message = "Title must be between 2 and 120 characters"),
        custom(function = "printable_text")
    )]
    pub title: String,
    #[validate(
        length(min = 2, max = 120, message = "Author must be between 2 and 120 characters"),
        custom(function = "printable_text")
    )]
    pub author: String,
    pub genre: BookGenre,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

/// Partial update request. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<BookGenre>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

/// Search query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text matched against title or author
    pub valor: Option<String>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 10)
    pub page_size: Option<i64>,
}

/// Paginated search result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<BookSummary>,
}

/// Text the store cannot hold: PostgreSQL rejects NUL in text columns
pub fn has_nul(value: &str) -> bool {
    value.contains('\0')
}

fn printable_text(value: &str) -> Result<(), ValidationError> {
    if has_nul(value) {
        return Err(ValidationError::new("nul").with_message("must not contain NUL characters".into()));
    }
    Ok(())
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Price cannot be negative".into()));
    }
    Ok(())
}

//! Data models for the bookstore

pub mod book;
pub mod enums;

// Re-export commonly used types
pub use book::{Book, BookPatch, BookSummary, NewBook, SearchPage, SearchQuery};
pub use enums::BookGenre;

//! API handlers for the bookstore REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{routing::get, Router};

use crate::AppState;

/// Book and health routes, relative to the configured base path
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
}

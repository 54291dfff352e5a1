//! Book inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, NewBook, SearchPage, SearchQuery},
};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 204, description = "No books registered")
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Response> {
    let books = state.services.books.list_books().await?;
    if books.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(books).into_response())
}

/// Search books by title or author, paginated
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of matching books", body = SearchPage),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 404, description = "No books on this page", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<SearchPage>> {
    let page = state.services.books.search_books(&query).await?;
    Ok(Json(page))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "A book with this title and author already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<NewBook>, AppError>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a book; only the fields sent are changed
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = BookPatch,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid field value", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Another book has this title and author", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(patch), _): WithRejection<Json<BookPatch>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.update_book(id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Book endpoints

use axum::extract::{Path, State};

use super::FormPairs;
use crate::{
    error::AppResult,
    models::FieldBag,
    views::{BookDeleteView, BookDetailView, BookFormView, BookListView, Page},
    AppState,
};

/// List books by title with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses((status = 200, description = "`book_list` view"))
)]
pub async fn book_list(State(state): State<AppState>) -> AppResult<Page<BookListView>> {
    state.services.catalog.book_list().await
}

/// Book with its author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "`book_detail` view"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookDetailView>> {
    state.services.catalog.book_detail(id).await
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses((status = 200, description = "`book_form` view"))
)]
pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Page<BookFormView>> {
    state.services.catalog.book_create_form().await
}

/// Create a book from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "`book_form` view with errors"),
        (status = 303, description = "Created; redirect to the new book")
    )
)]
pub async fn book_create_post(
    State(state): State<AppState>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<BookFormView>> {
    state
        .services
        .catalog
        .book_create(FieldBag::from_pairs(pairs))
        .await
}

/// Book form prefilled with the stored book
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "`book_form` view"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookFormView>> {
    state.services.catalog.book_update_form(id).await
}

/// Overwrite a book from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "`book_form` view with errors"),
        (status = 303, description = "Updated; redirect to the book"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<BookFormView>> {
    state
        .services
        .catalog
        .book_update(id, FieldBag::from_pairs(pairs))
        .await
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "`book_delete` view listing remaining copies"),
        (status = 303, description = "Book does not exist; redirect to the list")
    )
)]
pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookDeleteView>> {
    state.services.catalog.book_delete_form(id).await
}

/// Delete a book that has no copies
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Still referenced; `book_delete` view"),
        (status = 303, description = "Deleted or absent; redirect to the list")
    )
)]
pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookDeleteView>> {
    state.services.catalog.book_delete(id).await
}

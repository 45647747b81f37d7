//! Book instance endpoints

use axum::extract::{Path, State};

use super::FormPairs;
use crate::{
    error::AppResult,
    models::FieldBag,
    views::{BookInstanceDeleteView, BookInstanceDetailView, BookInstanceFormView, BookInstanceListView, Page},
    AppState,
};

/// List every copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses((status = 200, description = "`bookinstance_list` view"))
)]
pub async fn book_instance_list(State(state): State<AppState>) -> AppResult<Page<BookInstanceListView>> {
    state.services.catalog.book_instance_list().await
}

/// One copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "`bookinstance_detail` view"),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_instance_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookInstanceDetailView>> {
    state.services.catalog.book_instance_detail(id).await
}

/// Empty book instance form
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses((status = 200, description = "`bookinstance_form` view"))
)]
pub async fn book_instance_create_get(State(state): State<AppState>) -> AppResult<Page<BookInstanceFormView>> {
    state.services.catalog.book_instance_create_form().await
}

/// Create a book instance from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "`bookinstance_form` view with errors"),
        (status = 303, description = "Created; redirect to the new book instance")
    )
)]
pub async fn book_instance_create_post(
    State(state): State<AppState>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<BookInstanceFormView>> {
    state
        .services
        .catalog
        .book_instance_create(FieldBag::from_pairs(pairs))
        .await
}

/// Book instance form prefilled with the stored book instance
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "`bookinstance_form` view"),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_instance_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookInstanceFormView>> {
    state.services.catalog.book_instance_update_form(id).await
}

/// Overwrite a book instance from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "`bookinstance_form` view with errors"),
        (status = 303, description = "Updated; redirect to the book instance"),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_instance_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<BookInstanceFormView>> {
    state
        .services
        .catalog
        .book_instance_update(id, FieldBag::from_pairs(pairs))
        .await
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "`bookinstance_delete` view confirming the copy to remove"),
        (status = 303, description = "Book instance does not exist; redirect to the list")
    )
)]
pub async fn book_instance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookInstanceDeleteView>> {
    state.services.catalog.book_instance_delete_form(id).await
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 303, description = "Deleted or absent; redirect to the list")
    )
)]
pub async fn book_instance_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<BookInstanceDeleteView>> {
    state.services.catalog.book_instance_delete(id).await
}

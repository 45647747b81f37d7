//! Author endpoints

use axum::extract::{Path, State};

use super::FormPairs;
use crate::{
    error::AppResult,
    models::FieldBag,
    views::{AuthorDeleteView, AuthorDetailView, AuthorFormView, AuthorListView, Page},
    AppState,
};

/// List authors by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses((status = 200, description = "`author_list` view"))
)]
pub async fn author_list(State(state): State<AppState>) -> AppResult<Page<AuthorListView>> {
    state.services.catalog.author_list().await
}

/// Author with the books they wrote
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_detail` view"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<AuthorDetailView>> {
    state.services.catalog.author_detail(id).await
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses((status = 200, description = "`author_form` view"))
)]
pub async fn author_create_get(State(state): State<AppState>) -> AppResult<Page<AuthorFormView>> {
    state.services.catalog.author_create_form().await
}

/// Create an author from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "`author_form` view with errors"),
        (status = 303, description = "Created; redirect to the new author")
    )
)]
pub async fn author_create_post(
    State(state): State<AppState>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<AuthorFormView>> {
    state
        .services
        .catalog
        .author_create(FieldBag::from_pairs(pairs))
        .await
}

/// Author form prefilled with the stored author
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_form` view"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<AuthorFormView>> {
    state.services.catalog.author_update_form(id).await
}

/// Overwrite an author from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_form` view with errors"),
        (status = 303, description = "Updated; redirect to the author"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<AuthorFormView>> {
    state
        .services
        .catalog
        .author_update(id, FieldBag::from_pairs(pairs))
        .await
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_delete` view listing blocking books"),
        (status = 303, description = "Author does not exist; redirect to the list")
    )
)]
pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<AuthorDeleteView>> {
    state.services.catalog.author_delete_form(id).await
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Still referenced; `author_delete` view"),
        (status = 303, description = "Deleted or absent; redirect to the list")
    )
)]
pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<AuthorDeleteView>> {
    state.services.catalog.author_delete(id).await
}

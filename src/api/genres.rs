//! Genre endpoints

use axum::extract::{Path, State};

use super::FormPairs;
use crate::{
    error::AppResult,
    models::FieldBag,
    views::{GenreDeleteView, GenreDetailView, GenreFormView, GenreListView, Page},
    AppState,
};

/// List genres by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses((status = 200, description = "`genre_list` view"))
)]
pub async fn genre_list(State(state): State<AppState>) -> AppResult<Page<GenreListView>> {
    state.services.catalog.genre_list().await
}

/// Genre with the books filed under it
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_detail` view"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<GenreDetailView>> {
    state.services.catalog.genre_detail(id).await
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses((status = 200, description = "`genre_form` view"))
)]
pub async fn genre_create_get(State(state): State<AppState>) -> AppResult<Page<GenreFormView>> {
    state.services.catalog.genre_create_form().await
}

/// Create a genre from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "`genre_form` view with errors"),
        (status = 303, description = "Created, or already present under that name; redirect to the genre")
    )
)]
pub async fn genre_create_post(
    State(state): State<AppState>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<GenreFormView>> {
    state
        .services
        .catalog
        .genre_create(FieldBag::from_pairs(pairs))
        .await
}

/// Genre form prefilled with the stored genre
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_form` view"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<GenreFormView>> {
    state.services.catalog.genre_update_form(id).await
}

/// Overwrite a genre from a urlencoded form
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_form` view with errors"),
        (status = 303, description = "Updated; redirect to the genre"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    axum::Form(pairs): FormPairs,
) -> AppResult<Page<GenreFormView>> {
    state
        .services
        .catalog
        .genre_update(id, FieldBag::from_pairs(pairs))
        .await
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_delete` view listing books filed under it"),
        (status = 303, description = "Genre does not exist; redirect to the list")
    )
)]
pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<GenreDeleteView>> {
    state.services.catalog.genre_delete_form(id).await
}

/// Delete a genre no book is filed under
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Still referenced; `genre_delete` view"),
        (status = 303, description = "Deleted or absent; redirect to the list")
    )
)]
pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Page<GenreDeleteView>> {
    state.services.catalog.genre_delete(id).await
}

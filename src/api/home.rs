//! Catalog home page

use axum::extract::State;

use crate::{
    views::{IndexView, Page},
    AppState,
};

/// Summary counts of the catalog
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "`index` view; carries `error` instead of counts when they could not be loaded")
    )
)]
pub async fn index(State(state): State<AppState>) -> Page<IndexView> {
    Page::Render(state.services.catalog.index().await)
}

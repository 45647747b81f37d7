//! Catalog orchestration
//!
//! Each operation coordinates lookups, form validation and the dependent
//! check before removal, then hands back a view to render or a location to
//! redirect to. Validation failures and blocked deletions are ordinary pages;
//! only missing records and store faults come back as errors.

mod authors;
mod book_instances;
mod books;
mod genres;

use std::sync::Arc;

use super::aggregate::{keyed, Lookup};
use crate::{
    error::{AppError, AppResult},
    models::BookInstanceStatus,
    repository::CatalogStore,
    views::IndexView,
};

pub const AUTHORS_URL: &str = "/catalog/authors";
pub const BOOKS_URL: &str = "/catalog/books";
pub const GENRES_URL: &str = "/catalog/genres";
pub const BOOK_INSTANCES_URL: &str = "/catalog/bookinstances";

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Home page counts. A failed lookup still renders the page, with the
    /// error set and no counts.
    pub async fn index(&self) -> IndexView {
        let store = self.store.as_ref();
        let lookups: Vec<(&'static str, Lookup<'_, i64>)> = vec![
            ("book_count", store.books_count()),
            ("book_instance_count", store.book_instances_count(None)),
            (
                "book_instance_available_count",
                store.book_instances_count(Some(BookInstanceStatus::Available)),
            ),
            ("author_count", store.authors_count()),
            ("genre_count", store.genres_count()),
        ];

        let title = "Local Library Home".to_string();
        match keyed(lookups).await {
            Ok(data) => IndexView {
                title,
                error: None,
                data,
            },
            Err(e) => {
                tracing::warn!("Home page counts unavailable: {}", e);
                IndexView {
                    title,
                    error: Some(e.to_string()),
                    data: Default::default(),
                }
            }
        }
    }
}

fn not_found(kind: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

/// A record that vanished between the dependent check and its removal is
/// already gone
fn removed(result: AppResult<()>) -> AppResult<()> {
    match result {
        Err(AppError::NotFound(_)) => Ok(()),
        other => other,
    }
}

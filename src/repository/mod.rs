//! Repository layer for catalog persistence
//!
//! [`CatalogStore`] is the seam the orchestration core talks to. [`Repository`]
//! implements it over PostgreSQL; [`memory::MemoryStore`] keeps everything in
//! process.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Author, AuthorDraft, Book, BookDetails, BookDraft, BookInstance, BookInstanceDetails,
        BookInstanceDraft, BookInstanceStatus, BookSummary, Genre, GenreDraft,
    },
};

pub use memory::MemoryStore;

/// Record store operations needed by the catalog.
///
/// Lookups by identity return `Ok(None)` for a missing record. Updates and
/// removals of a missing record fail with `AppError::NotFound`. Each call is
/// atomic on its own; nothing spans calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All authors ordered by family name
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>>;
    async fn authors_count(&self) -> AppResult<i64>;
    async fn authors_create(&self, draft: &AuthorDraft) -> AppResult<Author>;
    async fn authors_update(&self, id: i32, draft: &AuthorDraft) -> AppResult<Author>;
    async fn authors_delete(&self, id: i32) -> AppResult<()>;

    /// All books ordered by title, author resolved
    async fn books_list(&self) -> AppResult<Vec<BookSummary>>;
    async fn books_get(&self, id: i32) -> AppResult<Option<Book>>;
    /// Book with author and genres resolved
    async fn books_get_details(&self, id: i32) -> AppResult<Option<BookDetails>>;
    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>>;
    async fn books_count(&self) -> AppResult<i64>;
    async fn books_create(&self, draft: &BookDraft) -> AppResult<Book>;
    async fn books_update(&self, id: i32, draft: &BookDraft) -> AppResult<Book>;
    async fn books_delete(&self, id: i32) -> AppResult<()>;

    /// All genres ordered by name
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>>;
    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn genres_count(&self) -> AppResult<i64>;
    async fn genres_create(&self, draft: &GenreDraft) -> AppResult<Genre>;
    async fn genres_update(&self, id: i32, draft: &GenreDraft) -> AppResult<Genre>;
    async fn genres_delete(&self, id: i32) -> AppResult<()>;

    /// All copies with their book resolved
    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>>;
    async fn book_instances_get(&self, id: i32) -> AppResult<Option<BookInstance>>;
    async fn book_instances_get_details(&self, id: i32) -> AppResult<Option<BookInstanceDetails>>;
    async fn book_instances_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;
    /// Number of copies, optionally restricted to one status
    async fn book_instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64>;
    async fn book_instances_create(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance>;
    async fn book_instances_update(&self, id: i32, draft: &BookInstanceDraft) -> AppResult<BookInstance>;
    async fn book_instances_delete(&self, id: i32) -> AppResult<()>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Repository::authors_list(self).await
    }

    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>> {
        Repository::authors_get(self, id).await
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Repository::authors_count(self).await
    }

    async fn authors_create(&self, draft: &AuthorDraft) -> AppResult<Author> {
        Repository::authors_create(self, draft).await
    }

    async fn authors_update(&self, id: i32, draft: &AuthorDraft) -> AppResult<Author> {
        Repository::authors_update(self, id, draft).await
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        Repository::authors_delete(self, id).await
    }

    async fn books_list(&self) -> AppResult<Vec<BookSummary>> {
        Repository::books_list(self).await
    }

    async fn books_get(&self, id: i32) -> AppResult<Option<Book>> {
        Repository::books_get(self, id).await
    }

    async fn books_get_details(&self, id: i32) -> AppResult<Option<BookDetails>> {
        Repository::books_get_details(self, id).await
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        Repository::books_by_author(self, author_id).await
    }

    async fn books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        Repository::books_by_genre(self, genre_id).await
    }

    async fn books_count(&self) -> AppResult<i64> {
        Repository::books_count(self).await
    }

    async fn books_create(&self, draft: &BookDraft) -> AppResult<Book> {
        Repository::books_create(self, draft).await
    }

    async fn books_update(&self, id: i32, draft: &BookDraft) -> AppResult<Book> {
        Repository::books_update(self, id, draft).await
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        Repository::books_delete(self, id).await
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        Repository::genres_list(self).await
    }

    async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>> {
        Repository::genres_get(self, id).await
    }

    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        Repository::genres_find_by_name(self, name).await
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Repository::genres_count(self).await
    }

    async fn genres_create(&self, draft: &GenreDraft) -> AppResult<Genre> {
        Repository::genres_create(self, draft).await
    }

    async fn genres_update(&self, id: i32, draft: &GenreDraft) -> AppResult<Genre> {
        Repository::genres_update(self, id, draft).await
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        Repository::genres_delete(self, id).await
    }

    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>> {
        Repository::book_instances_list(self).await
    }

    async fn book_instances_get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        Repository::book_instances_get(self, id).await
    }

    async fn book_instances_get_details(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        Repository::book_instances_get_details(self, id).await
    }

    async fn book_instances_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        Repository::book_instances_by_book(self, book_id).await
    }

    async fn book_instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        Repository::book_instances_count(self, status).await
    }

    async fn book_instances_create(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        Repository::book_instances_create(self, draft).await
    }

    async fn book_instances_update(&self, id: i32, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        Repository::book_instances_update(self, id, draft).await
    }

    async fn book_instances_delete(&self, id: i32) -> AppResult<()> {
        Repository::book_instances_delete(self, id).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

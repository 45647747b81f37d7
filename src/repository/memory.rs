//! In-process catalog store
//!
//! Mirrors the PostgreSQL schema, foreign keys included: removing a record
//! that is still referenced fails instead of leaving dangling references.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorDraft, Book, BookDetails, BookDraft, BookInstance, BookInstanceDetails,
        BookInstanceDraft, BookInstanceStatus, BookSummary, Genre, GenreDraft,
    },
};

#[derive(Default)]
struct Tables {
    next_id: i32,
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    genres: BTreeMap<i32, Genre>,
    book_instances: BTreeMap<i32, BookInstance>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_book_refs(&self, draft: &BookDraft) -> AppResult<()> {
        if !self.authors.contains_key(&draft.author_id) {
            return Err(foreign_key("books", "author", draft.author_id));
        }
        if let Some(missing) = draft.genre_ids.iter().find(|id| !self.genres.contains_key(*id)) {
            return Err(foreign_key("book_genres", "genre", *missing));
        }
        Ok(())
    }
}

fn foreign_key(table: &str, target: &str, id: i32) -> AppError {
    AppError::Internal(format!(
        "foreign key violation on {}: {} {} does not exist",
        table, target, id
    ))
}

fn still_referenced(target: &str, id: i32, table: &str) -> AppError {
    AppError::Internal(format!(
        "foreign key violation: {} {} is still referenced from {}",
        target, id, table
    ))
}

fn book_from_draft(id: i32, draft: &BookDraft) -> Book {
    let mut genre_ids = draft.genre_ids.clone();
    genre_ids.sort_unstable();
    genre_ids.dedup();
    Book {
        id,
        title: draft.title.clone(),
        author_id: draft.author_id,
        summary: draft.summary.clone(),
        isbn: draft.isbn.clone(),
        genre_ids,
    }
}

fn by_title(mut books: Vec<Book>) -> Vec<Book> {
    books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    books
}

/// Catalog store kept entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.len() as i64)
    }

    async fn authors_create(&self, draft: &AuthorDraft) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = Author {
            id: tables.next_id(),
            first_name: draft.first_name.clone(),
            family_name: draft.family_name.clone(),
            date_of_birth: draft.date_of_birth,
            date_of_death: draft.date_of_death,
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_update(&self, id: i32, draft: &AuthorDraft) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = tables
            .authors
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        author.first_name = draft.first_name.clone();
        author.family_name = draft.family_name.clone();
        author.date_of_birth = draft.date_of_birth;
        author.date_of_death = draft.date_of_death;
        Ok(author.clone())
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.author_id == id) {
            return Err(still_referenced("author", id, "books"));
        }
        tables
            .authors
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn books_list(&self) -> AppResult<Vec<BookSummary>> {
        let tables = self.tables.read().await;
        let books = by_title(tables.books.values().cloned().collect());
        Ok(books
            .into_iter()
            .map(|b| BookSummary {
                id: b.id,
                author: tables.authors.get(&b.author_id).cloned(),
                title: b.title,
            })
            .collect())
    }

    async fn books_get(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn books_get_details(&self, id: i32) -> AppResult<Option<BookDetails>> {
        let tables = self.tables.read().await;
        let Some(book) = tables.books.get(&id) else {
            return Ok(None);
        };
        let mut genres: Vec<Genre> = book
            .genre_ids
            .iter()
            .filter_map(|gid| tables.genres.get(gid).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(BookDetails {
            id: book.id,
            title: book.title.clone(),
            author: tables.authors.get(&book.author_id).cloned(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genres,
        }))
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(by_title(
            tables
                .books
                .values()
                .filter(|b| b.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(by_title(
            tables
                .books
                .values()
                .filter(|b| b.genre_ids.contains(&genre_id))
                .cloned()
                .collect(),
        ))
    }

    async fn books_count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.books.len() as i64)
    }

    async fn books_create(&self, draft: &BookDraft) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_book_refs(draft)?;
        let book = book_from_draft(tables.next_id(), draft);
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn books_update(&self, id: i32, draft: &BookDraft) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tables.check_book_refs(draft)?;
        let book = book_from_draft(id, draft);
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.book_instances.values().any(|i| i.book_id == id) {
            return Err(still_referenced("book", id, "book_instances"));
        }
        tables
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>> {
        Ok(self.tables.read().await.genres.get(&id).cloned())
    }

    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.genres.values().find(|g| g.name == name).cloned())
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.genres.len() as i64)
    }

    async fn genres_create(&self, draft: &GenreDraft) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        let genre = Genre {
            id: tables.next_id(),
            name: draft.name.clone(),
        };
        tables.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn genres_update(&self, id: i32, draft: &GenreDraft) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        let genre = tables
            .genres
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?;
        genre.name = draft.name.clone();
        Ok(genre.clone())
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.genre_ids.contains(&id)) {
            return Err(still_referenced("genre", id, "book_genres"));
        }
        tables
            .genres
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .book_instances
            .values()
            .map(|i| BookInstanceDetails {
                id: i.id,
                book: tables.books.get(&i.book_id).cloned(),
                imprint: i.imprint.clone(),
                status: i.status,
                due_back: i.due_back,
            })
            .collect())
    }

    async fn book_instances_get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        Ok(self.tables.read().await.book_instances.get(&id).cloned())
    }

    async fn book_instances_get_details(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.book_instances.get(&id).map(|i| BookInstanceDetails {
            id: i.id,
            book: tables.books.get(&i.book_id).cloned(),
            imprint: i.imprint.clone(),
            status: i.status,
            due_back: i.due_back,
        }))
    }

    async fn book_instances_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        Ok(tables
            .book_instances
            .values()
            .filter(|i| i.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn book_instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .book_instances
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count();
        Ok(count as i64)
    }

    async fn book_instances_create(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&draft.book_id) {
            return Err(foreign_key("book_instances", "book", draft.book_id));
        }
        let instance = BookInstance {
            id: tables.next_id(),
            book_id: draft.book_id,
            imprint: draft.imprint.clone(),
            status: draft.status,
            due_back: draft.due_back,
        };
        tables.book_instances.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn book_instances_update(&self, id: i32, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&draft.book_id) {
            return Err(foreign_key("book_instances", "book", draft.book_id));
        }
        let instance = tables
            .book_instances
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        instance.book_id = draft.book_id;
        instance.imprint = draft.imprint.clone();
        instance.status = draft.status;
        instance.due_back = draft.due_back;
        Ok(instance.clone())
    }

    async fn book_instances_delete(&self, id: i32) -> AppResult<()> {
        self.tables
            .write()
            .await
            .book_instances
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_draft(first: &str, family: &str) -> AuthorDraft {
        AuthorDraft {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn test_authors_sorted_by_family_name() {
        let store = MemoryStore::new();
        store.authors_create(&author_draft("Ursula", "LeGuin")).await.unwrap();
        store.authors_create(&author_draft("Isaac", "Asimov")).await.unwrap();

        let names: Vec<String> = store
            .authors_list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(names, vec!["Asimov", "LeGuin"]);
    }

    #[tokio::test]
    async fn test_referenced_author_cannot_be_removed() {
        let store = MemoryStore::new();
        let author = store.authors_create(&author_draft("Isaac", "Asimov")).await.unwrap();
        store
            .books_create(&BookDraft {
                title: "Foundation".to_string(),
                author_id: author.id,
                summary: "Psychohistory".to_string(),
                isbn: "9780553293357".to_string(),
                genre_ids: vec![],
            })
            .await
            .unwrap();

        assert!(matches!(
            store.authors_delete(author.id).await,
            Err(AppError::Internal(_))
        ));
        assert!(store.authors_get(author.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_records_report_not_found() {
        let store = MemoryStore::new();
        assert!(store.authors_get(42).await.unwrap().is_none());
        assert!(matches!(store.books_delete(42).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.authors_update(42, &author_draft("A", "B")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_count_copies_by_status() {
        let store = MemoryStore::new();
        let author = store.authors_create(&author_draft("Isaac", "Asimov")).await.unwrap();
        let book = store
            .books_create(&BookDraft {
                title: "I, Robot".to_string(),
                author_id: author.id,
                summary: "Three laws".to_string(),
                isbn: "9780553382563".to_string(),
                genre_ids: vec![],
            })
            .await
            .unwrap();
        for status in [BookInstanceStatus::Available, BookInstanceStatus::Loaned] {
            store
                .book_instances_create(&BookInstanceDraft {
                    book_id: book.id,
                    imprint: "Bantam".to_string(),
                    status,
                    due_back: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.book_instances_count(None).await.unwrap(), 2);
        assert_eq!(
            store
                .book_instances_count(Some(BookInstanceStatus::Available))
                .await
                .unwrap(),
            1
        );
    }
}

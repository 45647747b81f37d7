use super::{not_found, removed, CatalogService, BOOKS_URL};
use crate::{
    error::AppResult,
    models::{BookFields, FieldBag, Record},
    services::{
        aggregate::{join2, join3},
        forms::{self, Rejected},
        guard::{check_dependents, DeleteCheck},
        normalize::normalize_selection,
        selection::{annotate, chosen_ids},
        validation::Violation,
    },
    views::{AuthorEntry, BookDeleteView, BookDetailView, BookFormView, BookListView, Page},
};

impl CatalogService {
    pub async fn book_list(&self) -> AppResult<Page<BookListView>> {
        let book_list = self.store.books_list().await?;
        Ok(Page::Render(BookListView {
            title: "Book List".to_string(),
            book_list,
        }))
    }

    pub async fn book_detail(&self, id: i32) -> AppResult<Page<BookDetailView>> {
        let (book, book_instances) = join2(
            self.store.books_get_details(id),
            self.store.book_instances_by_book(id),
        )
        .await?;
        let book = book.ok_or_else(|| not_found("Book", id))?;
        Ok(Page::Render(BookDetailView {
            title: book.title.clone(),
            book,
            book_instances,
        }))
    }

    /// Book form with every author and genre, genres checked by identity
    async fn book_form(
        &self,
        title: &str,
        book: Option<BookFields>,
        chosen_genres: &[i32],
        errors: Vec<Violation>,
    ) -> AppResult<Page<BookFormView>> {
        let (authors, genres) = join2(self.store.authors_list(), self.store.genres_list()).await?;
        Ok(Page::Render(BookFormView {
            title: title.to_string(),
            authors: authors.into_iter().map(AuthorEntry::from).collect(),
            genres: annotate(genres, chosen_genres),
            book,
            errors,
        }))
    }

    async fn rejected_book_form(
        &self,
        title: &str,
        rejected: Rejected<BookFields>,
    ) -> AppResult<Page<BookFormView>> {
        tracing::debug!("Book form rejected with {} violation(s)", rejected.errors.len());
        let chosen = chosen_ids(&rejected.fields.genre);
        self.book_form(title, Some(rejected.fields), &chosen, rejected.errors)
            .await
    }

    pub async fn book_create_form(&self) -> AppResult<Page<BookFormView>> {
        self.book_form("Create Book", None, &[], Vec::new()).await
    }

    pub async fn book_create(&self, mut raw: FieldBag) -> AppResult<Page<BookFormView>> {
        normalize_selection(&mut raw, "genre");
        let draft = match forms::validate_book(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return self.rejected_book_form("Create Book", rejected).await,
        };
        let book = self.store.books_create(&draft).await?;
        tracing::info!("Created book id={} ({} genre(s))", book.id, book.genre_ids.len());
        Ok(Page::redirect(book.url()))
    }

    pub async fn book_update_form(&self, id: i32) -> AppResult<Page<BookFormView>> {
        let (book, authors, genres) = join3(
            self.store.books_get(id),
            self.store.authors_list(),
            self.store.genres_list(),
        )
        .await?;
        let book = book.ok_or_else(|| not_found("Book", id))?;
        Ok(Page::Render(BookFormView {
            title: "Update Book".to_string(),
            authors: authors.into_iter().map(AuthorEntry::from).collect(),
            genres: annotate(genres, &book.genre_ids),
            book: Some(BookFields::from(&book)),
            errors: Vec::new(),
        }))
    }

    pub async fn book_update(&self, id: i32, mut raw: FieldBag) -> AppResult<Page<BookFormView>> {
        normalize_selection(&mut raw, "genre");
        let draft = match forms::validate_book(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return self.rejected_book_form("Update Book", rejected).await,
        };
        let book = self.store.books_update(id, &draft).await?;
        tracing::info!("Updated book id={}", book.id);
        Ok(Page::redirect(book.url()))
    }

    pub async fn book_delete_form(&self, id: i32) -> AppResult<Page<BookDeleteView>> {
        let check =
            check_dependents(self.store.books_get(id), self.store.book_instances_by_book(id))
                .await?;
        let (book, book_instances) = match check {
            DeleteCheck::Missing => return Ok(Page::redirect(BOOKS_URL)),
            DeleteCheck::Blocked { parent, dependents } => (parent, dependents),
            DeleteCheck::Clear { parent } => (parent, Vec::new()),
        };
        Ok(Page::Render(BookDeleteView {
            title: "Delete Book".to_string(),
            book,
            book_instances,
        }))
    }

    /// Remove a book unless copies of it still exist
    pub async fn book_delete(&self, id: i32) -> AppResult<Page<BookDeleteView>> {
        let check =
            check_dependents(self.store.books_get(id), self.store.book_instances_by_book(id))
                .await?;
        match check {
            DeleteCheck::Missing => Ok(Page::redirect(BOOKS_URL)),
            DeleteCheck::Blocked { parent, dependents } => {
                tracing::warn!(
                    "Refusing to delete book id={}: {} copy(ies) still reference it",
                    id,
                    dependents.len()
                );
                Ok(Page::Render(BookDeleteView {
                    title: "Delete Book".to_string(),
                    book: parent,
                    book_instances: dependents,
                }))
            }
            DeleteCheck::Clear { .. } => {
                removed(self.store.books_delete(id).await)?;
                tracing::info!("Deleted book id={}", id);
                Ok(Page::redirect(BOOKS_URL))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::{
        error::AppError,
        models::{AuthorDraft, BookDraft, BookInstanceDraft, BookInstanceStatus, GenreDraft},
        repository::{CatalogStore, MemoryStore},
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        service: CatalogService,
        author_id: i32,
        genre_ids: Vec<i32>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .authors_create(&AuthorDraft {
                first_name: "Frank".to_string(),
                family_name: "Herbert".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let mut genre_ids = Vec::new();
        for name in ["Science Fiction", "Fantasy", "Poetry"] {
            let genre = store
                .genres_create(&GenreDraft {
                    name: name.to_string(),
                })
                .await
                .unwrap();
            genre_ids.push(genre.id);
        }
        Fixture {
            service: CatalogService::new(store.clone()),
            store,
            author_id: author.id,
            genre_ids,
        }
    }

    fn submission(fx: &Fixture, title: &str, genres: &[i32]) -> FieldBag {
        let mut pairs = vec![
            ("title".to_string(), title.to_string()),
            ("author".to_string(), fx.author_id.to_string()),
            ("summary".to_string(), "Desert planet".to_string()),
            ("isbn".to_string(), "9780441013593".to_string()),
        ];
        pairs.extend(genres.iter().map(|id| ("genre".to_string(), id.to_string())));
        FieldBag::from_pairs(pairs)
    }

    #[tokio::test]
    async fn test_create_form_lists_references() {
        let fx = fixture().await;

        let view = fx.service.book_create_form().await.unwrap().into_view().unwrap();

        assert_eq!(view.authors.len(), 1);
        assert_eq!(view.authors[0].name, "Herbert, Frank");
        assert_eq!(view.genres.len(), 3);
        assert!(view.genres.iter().all(|g| !g.checked));
        assert!(view.book.is_none());
    }

    #[tokio::test]
    async fn test_create_with_single_genre() {
        let fx = fixture().await;
        let genre = fx.genre_ids[1];

        let page = fx
            .service
            .book_create(submission(&fx, "Dune", &[genre]))
            .await
            .unwrap();

        let books = fx.store.books_by_genre(genre).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(page.location(), Some(books[0].url().as_str()));
        assert_eq!(books[0].genre_ids, vec![genre]);
    }

    #[tokio::test]
    async fn test_update_form_checks_current_genres() {
        let fx = fixture().await;
        let book = fx
            .store
            .books_create(&BookDraft {
                title: "Dune".to_string(),
                author_id: fx.author_id,
                summary: "Desert planet".to_string(),
                isbn: "9780441013593".to_string(),
                genre_ids: vec![fx.genre_ids[0], fx.genre_ids[2]],
            })
            .await
            .unwrap();

        let view = fx.service.book_update_form(book.id).await.unwrap().into_view().unwrap();

        let checked: Vec<&str> = view
            .genres
            .iter()
            .filter(|g| g.checked)
            .map(|g| g.item.name.as_str())
            .collect();
        assert_eq!(checked, vec!["Poetry", "Science Fiction"]);
        assert_eq!(view.book.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn test_update_replaces_genres() {
        let fx = fixture().await;
        fx.service
            .book_create(submission(&fx, "Dune", &[fx.genre_ids[0]]))
            .await
            .unwrap();
        let book = fx.store.books_by_author(fx.author_id).await.unwrap().remove(0);

        fx.service
            .book_update(book.id, submission(&fx, "Dune Messiah", &[]))
            .await
            .unwrap();

        let stored = fx.store.books_get(book.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Dune Messiah");
        assert!(stored.genre_ids.is_empty());
    }

    #[tokio::test]
    async fn test_missing_book() {
        let fx = fixture().await;
        assert!(matches!(fx.service.book_detail(404).await, Err(AppError::NotFound(_))));
        assert!(matches!(fx.service.book_update_form(404).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            fx.service.book_update(404, submission(&fx, "Dune", &[])).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_copies() {
        let fx = fixture().await;
        fx.service
            .book_create(submission(&fx, "Dune", &[]))
            .await
            .unwrap();
        let book = fx.store.books_by_author(fx.author_id).await.unwrap().remove(0);
        fx.store
            .book_instances_create(&BookInstanceDraft {
                book_id: book.id,
                imprint: "Ace, 1990".to_string(),
                status: BookInstanceStatus::Available,
                due_back: Utc::now(),
            })
            .await
            .unwrap();

        let view = fx.service.book_delete(book.id).await.unwrap().into_view().unwrap();

        assert_eq!(view.book_instances.len(), 1);
        assert!(fx.store.books_get(book.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_detail_lists_copies() {
        let fx = fixture().await;
        fx.service
            .book_create(submission(&fx, "Dune", &[fx.genre_ids[0]]))
            .await
            .unwrap();
        let book = fx.store.books_by_author(fx.author_id).await.unwrap().remove(0);

        let view = fx.service.book_detail(book.id).await.unwrap().into_view().unwrap();

        assert_eq!(view.title, "Dune");
        assert_eq!(view.book.author.unwrap().family_name, "Herbert");
        assert_eq!(view.book.genres[0].name, "Science Fiction");
        assert!(view.book_instances.is_empty());
    }
}

use super::{not_found, removed, CatalogService, BOOK_INSTANCES_URL};
use crate::{
    error::AppResult,
    models::{BookInstanceDetails, BookInstanceFields, BookInstanceStatus, FieldBag, Record},
    services::{
        aggregate::join2,
        forms::{self, Rejected},
        selection::{annotate, chosen_ids},
        validation::Violation,
    },
    views::{
        BookInstanceDeleteView, BookInstanceDetailView, BookInstanceFormView,
        BookInstanceListView, Page,
    },
};

fn copy_title(instance: &BookInstanceDetails) -> String {
    match &instance.book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Copy".to_string(),
    }
}

impl CatalogService {
    pub async fn book_instance_list(&self) -> AppResult<Page<BookInstanceListView>> {
        let bookinstance_list = self.store.book_instances_list().await?;
        Ok(Page::Render(BookInstanceListView {
            title: "Book Instance List".to_string(),
            bookinstance_list,
        }))
    }

    pub async fn book_instance_detail(&self, id: i32) -> AppResult<Page<BookInstanceDetailView>> {
        let bookinstance = self
            .store
            .book_instances_get_details(id)
            .await?
            .ok_or_else(|| not_found("Book instance", id))?;
        Ok(Page::Render(BookInstanceDetailView {
            title: copy_title(&bookinstance),
            bookinstance,
        }))
    }

    /// Copy form with every book as a choice, the copy's own book checked
    async fn book_instance_form(
        &self,
        title: &str,
        bookinstance: Option<BookInstanceFields>,
        chosen_book: &[i32],
        errors: Vec<Violation>,
    ) -> AppResult<Page<BookInstanceFormView>> {
        let books = self.store.books_list().await?;
        Ok(Page::Render(BookInstanceFormView {
            title: title.to_string(),
            book_list: annotate(books, chosen_book),
            statuses: BookInstanceStatus::ALL.to_vec(),
            bookinstance,
            errors,
        }))
    }

    async fn rejected_book_instance_form(
        &self,
        title: &str,
        rejected: Rejected<BookInstanceFields>,
    ) -> AppResult<Page<BookInstanceFormView>> {
        tracing::debug!(
            "Book instance form rejected with {} violation(s)",
            rejected.errors.len()
        );
        let chosen = chosen_ids(&[rejected.fields.book.as_str()]);
        self.book_instance_form(title, Some(rejected.fields), &chosen, rejected.errors)
            .await
    }

    pub async fn book_instance_create_form(&self) -> AppResult<Page<BookInstanceFormView>> {
        self.book_instance_form("Create BookInstance", None, &[], Vec::new())
            .await
    }

    pub async fn book_instance_create(&self, raw: FieldBag) -> AppResult<Page<BookInstanceFormView>> {
        let draft = match forms::validate_book_instance(&raw) {
            Ok(draft) => draft,
            Err(rejected) => {
                return self
                    .rejected_book_instance_form("Create BookInstance", rejected)
                    .await
            }
        };
        let instance = self.store.book_instances_create(&draft).await?;
        tracing::info!(
            "Created book instance id={} for book id={}",
            instance.id,
            instance.book_id
        );
        Ok(Page::redirect(instance.url()))
    }

    pub async fn book_instance_update_form(&self, id: i32) -> AppResult<Page<BookInstanceFormView>> {
        let (instance, books) =
            join2(self.store.book_instances_get(id), self.store.books_list()).await?;
        let instance = instance.ok_or_else(|| not_found("Book instance", id))?;
        Ok(Page::Render(BookInstanceFormView {
            title: "Update BookInstance".to_string(),
            book_list: annotate(books, &[instance.book_id]),
            statuses: BookInstanceStatus::ALL.to_vec(),
            bookinstance: Some(BookInstanceFields::from(&instance)),
            errors: Vec::new(),
        }))
    }

    pub async fn book_instance_update(
        &self,
        id: i32,
        raw: FieldBag,
    ) -> AppResult<Page<BookInstanceFormView>> {
        let draft = match forms::validate_book_instance(&raw) {
            Ok(draft) => draft,
            Err(rejected) => {
                return self
                    .rejected_book_instance_form("Update BookInstance", rejected)
                    .await
            }
        };
        let instance = self.store.book_instances_update(id, &draft).await?;
        tracing::info!("Updated book instance id={}", instance.id);
        Ok(Page::redirect(instance.url()))
    }

    /// Copies have no dependents; only a missing copy short-circuits
    pub async fn book_instance_delete_form(&self, id: i32) -> AppResult<Page<BookInstanceDeleteView>> {
        match self.store.book_instances_get_details(id).await? {
            None => Ok(Page::redirect(BOOK_INSTANCES_URL)),
            Some(bookinstance) => Ok(Page::Render(BookInstanceDeleteView {
                title: "Delete BookInstance".to_string(),
                bookinstance,
            })),
        }
    }

    pub async fn book_instance_delete(&self, id: i32) -> AppResult<Page<BookInstanceDeleteView>> {
        removed(self.store.book_instances_delete(id).await)?;
        tracing::info!("Deleted book instance id={}", id);
        Ok(Page::redirect(BOOK_INSTANCES_URL))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::AppError,
        models::{AuthorDraft, BookDraft},
        repository::{CatalogStore, MemoryStore},
    };

    async fn store_with_book() -> (Arc<MemoryStore>, i32) {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .authors_create(&AuthorDraft {
                first_name: "Octavia".to_string(),
                family_name: "Butler".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let book = store
            .books_create(&BookDraft {
                title: "Kindred".to_string(),
                author_id: author.id,
                summary: "Time travel".to_string(),
                isbn: "9780807083697".to_string(),
                genre_ids: vec![],
            })
            .await
            .unwrap();
        (store, book.id)
    }

    #[tokio::test]
    async fn test_create_defaults_to_maintenance() {
        let (store, book_id) = store_with_book().await;
        let service = CatalogService::new(store.clone());
        let raw = FieldBag::new()
            .with("book", book_id.to_string())
            .with("imprint", "Beacon Press, 2003");

        let page = service.book_instance_create(raw).await.unwrap();

        let copies = store.book_instances_by_book(book_id).await.unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].status, BookInstanceStatus::Maintenance);
        assert_eq!(page.location(), Some(copies[0].url().as_str()));
    }

    #[tokio::test]
    async fn test_rejected_form_keeps_book_selected() {
        let (store, book_id) = store_with_book().await;
        let service = CatalogService::new(store);
        let raw = FieldBag::new()
            .with("book", book_id.to_string())
            .with("status", "Lost");

        let view = service
            .book_instance_create(raw)
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(view.errors.len(), 2);
        assert_eq!(view.book_list.len(), 1);
        assert!(view.book_list[0].checked);
        assert_eq!(view.statuses.len(), 4);
    }

    #[tokio::test]
    async fn test_detail_title_and_missing_copy() {
        let (store, book_id) = store_with_book().await;
        let service = CatalogService::new(store);
        let raw = FieldBag::new()
            .with("book", book_id.to_string())
            .with("imprint", "Beacon Press, 2003")
            .with("status", "Available");
        let location = service
            .book_instance_create(raw)
            .await
            .unwrap()
            .location()
            .unwrap()
            .to_string();
        let id: i32 = location.rsplit('/').next().unwrap().parse().unwrap();

        let view = service.book_instance_detail(id).await.unwrap().into_view().unwrap();
        assert_eq!(view.title, "Copy: Kindred");

        service.book_instance_delete(id).await.unwrap();
        assert!(matches!(service.book_instance_detail(id).await, Err(AppError::NotFound(_))));
        assert_eq!(
            service.book_instance_delete_form(id).await.unwrap().location(),
            Some(BOOK_INSTANCES_URL)
        );
    }
}

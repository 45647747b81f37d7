use super::{not_found, removed, CatalogService, AUTHORS_URL};
use crate::{
    error::AppResult,
    models::{AuthorFields, FieldBag, Record},
    services::{
        aggregate::join2,
        forms::{self, Rejected},
        guard::{check_dependents, DeleteCheck},
    },
    views::{
        AuthorDeleteView, AuthorDetailView, AuthorEntry, AuthorFormView, AuthorListView, Page,
    },
};

fn author_form(title: &str, rejected: Rejected<AuthorFields>) -> Page<AuthorFormView> {
    tracing::debug!("Author form rejected with {} violation(s)", rejected.errors.len());
    Page::Render(AuthorFormView {
        title: title.to_string(),
        author: Some(rejected.fields),
        errors: rejected.errors,
    })
}

impl CatalogService {
    pub async fn author_list(&self) -> AppResult<Page<AuthorListView>> {
        let author_list = self.store.authors_list().await?;
        Ok(Page::Render(AuthorListView {
            title: "Author List".to_string(),
            author_list: author_list.into_iter().map(AuthorEntry::from).collect(),
        }))
    }

    pub async fn author_detail(&self, id: i32) -> AppResult<Page<AuthorDetailView>> {
        let (author, author_books) =
            join2(self.store.authors_get(id), self.store.books_by_author(id)).await?;
        let author = author.ok_or_else(|| not_found("Author", id))?;
        Ok(Page::Render(AuthorDetailView {
            title: "Author Detail".to_string(),
            author: author.into(),
            author_books,
        }))
    }

    pub async fn author_create_form(&self) -> AppResult<Page<AuthorFormView>> {
        Ok(Page::Render(AuthorFormView {
            title: "Create Author".to_string(),
            author: None,
            errors: Vec::new(),
        }))
    }

    pub async fn author_create(&self, raw: FieldBag) -> AppResult<Page<AuthorFormView>> {
        let draft = match forms::validate_author(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return Ok(author_form("Create Author", rejected)),
        };
        let author = self.store.authors_create(&draft).await?;
        tracing::info!("Created author id={}", author.id);
        Ok(Page::redirect(author.url()))
    }

    pub async fn author_update_form(&self, id: i32) -> AppResult<Page<AuthorFormView>> {
        let author = self
            .store
            .authors_get(id)
            .await?
            .ok_or_else(|| not_found("Author", id))?;
        Ok(Page::Render(AuthorFormView {
            title: "Update Author".to_string(),
            author: Some(AuthorFields::from(&author)),
            errors: Vec::new(),
        }))
    }

    pub async fn author_update(&self, id: i32, raw: FieldBag) -> AppResult<Page<AuthorFormView>> {
        let draft = match forms::validate_author(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return Ok(author_form("Update Author", rejected)),
        };
        let author = self.store.authors_update(id, &draft).await?;
        tracing::info!("Updated author id={}", author.id);
        Ok(Page::redirect(author.url()))
    }

    pub async fn author_delete_form(&self, id: i32) -> AppResult<Page<AuthorDeleteView>> {
        let check =
            check_dependents(self.store.authors_get(id), self.store.books_by_author(id)).await?;
        let (author, author_books) = match check {
            DeleteCheck::Missing => return Ok(Page::redirect(AUTHORS_URL)),
            DeleteCheck::Blocked { parent, dependents } => (parent, dependents),
            DeleteCheck::Clear { parent } => (parent, Vec::new()),
        };
        Ok(Page::Render(AuthorDeleteView {
            title: "Delete Author".to_string(),
            author: author.into(),
            author_books,
        }))
    }

    /// Remove an author unless books still reference it
    pub async fn author_delete(&self, id: i32) -> AppResult<Page<AuthorDeleteView>> {
        let check =
            check_dependents(self.store.authors_get(id), self.store.books_by_author(id)).await?;
        match check {
            DeleteCheck::Missing => Ok(Page::redirect(AUTHORS_URL)),
            DeleteCheck::Blocked { parent, dependents } => {
                tracing::warn!(
                    "Refusing to delete author id={}: {} book(s) still reference it",
                    id,
                    dependents.len()
                );
                Ok(Page::Render(AuthorDeleteView {
                    title: "Delete Author".to_string(),
                    author: parent.into(),
                    author_books: dependents,
                }))
            }
            DeleteCheck::Clear { .. } => {
                removed(self.store.authors_delete(id).await)?;
                tracing::info!("Deleted author id={}", id);
                Ok(Page::redirect(AUTHORS_URL))
            }
        }
    }
}

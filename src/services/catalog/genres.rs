use super::{not_found, removed, CatalogService, GENRES_URL};
use crate::{
    error::AppResult,
    models::{FieldBag, GenreFields, Record},
    services::{
        aggregate::join2,
        forms::{self, Rejected},
        guard::{check_dependents, DeleteCheck},
    },
    views::{GenreDeleteView, GenreDetailView, GenreFormView, GenreListView, Page},
};

fn genre_form(title: &str, rejected: Rejected<GenreFields>) -> Page<GenreFormView> {
    tracing::debug!("Genre form rejected with {} violation(s)", rejected.errors.len());
    Page::Render(GenreFormView {
        title: title.to_string(),
        genre: Some(rejected.fields),
        errors: rejected.errors,
    })
}

impl CatalogService {
    pub async fn genre_list(&self) -> AppResult<Page<GenreListView>> {
        let genre_list = self.store.genres_list().await?;
        Ok(Page::Render(GenreListView {
            title: "Genre List".to_string(),
            genre_list,
        }))
    }

    pub async fn genre_detail(&self, id: i32) -> AppResult<Page<GenreDetailView>> {
        let (genre, genre_books) =
            join2(self.store.genres_get(id), self.store.books_by_genre(id)).await?;
        let genre = genre.ok_or_else(|| not_found("Genre", id))?;
        Ok(Page::Render(GenreDetailView {
            title: "Genre Detail".to_string(),
            genre,
            genre_books,
        }))
    }

    pub async fn genre_create_form(&self) -> AppResult<Page<GenreFormView>> {
        Ok(Page::Render(GenreFormView {
            title: "Create Genre".to_string(),
            genre: None,
            errors: Vec::new(),
        }))
    }

    /// Create a genre, or send the user to the existing one with that name
    pub async fn genre_create(&self, raw: FieldBag) -> AppResult<Page<GenreFormView>> {
        let draft = match forms::validate_genre(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return Ok(genre_form("Create Genre", rejected)),
        };
        if let Some(existing) = self.store.genres_find_by_name(&draft.name).await? {
            tracing::debug!("Genre '{}' already exists as id={}", draft.name, existing.id);
            return Ok(Page::redirect(existing.url()));
        }
        let genre = self.store.genres_create(&draft).await?;
        tracing::info!("Created genre id={}", genre.id);
        Ok(Page::redirect(genre.url()))
    }

    pub async fn genre_update_form(&self, id: i32) -> AppResult<Page<GenreFormView>> {
        let genre = self
            .store
            .genres_get(id)
            .await?
            .ok_or_else(|| not_found("Genre", id))?;
        Ok(Page::Render(GenreFormView {
            title: "Update Genre".to_string(),
            genre: Some(GenreFields { name: genre.name }),
            errors: Vec::new(),
        }))
    }

    pub async fn genre_update(&self, id: i32, raw: FieldBag) -> AppResult<Page<GenreFormView>> {
        let draft = match forms::validate_genre(&raw) {
            Ok(draft) => draft,
            Err(rejected) => return Ok(genre_form("Update Genre", rejected)),
        };
        let genre = self.store.genres_update(id, &draft).await?;
        tracing::info!("Updated genre id={}", genre.id);
        Ok(Page::redirect(genre.url()))
    }

    pub async fn genre_delete_form(&self, id: i32) -> AppResult<Page<GenreDeleteView>> {
        let check =
            check_dependents(self.store.genres_get(id), self.store.books_by_genre(id)).await?;
        let (genre, genre_books) = match check {
            DeleteCheck::Missing => return Ok(Page::redirect(GENRES_URL)),
            DeleteCheck::Blocked { parent, dependents } => (parent, dependents),
            DeleteCheck::Clear { parent } => (parent, Vec::new()),
        };
        Ok(Page::Render(GenreDeleteView {
            title: "Delete Genre".to_string(),
            genre,
            genre_books,
        }))
    }

    /// Remove a genre unless books are still filed under it
    pub async fn genre_delete(&self, id: i32) -> AppResult<Page<GenreDeleteView>> {
        let check =
            check_dependents(self.store.genres_get(id), self.store.books_by_genre(id)).await?;
        match check {
            DeleteCheck::Missing => Ok(Page::redirect(GENRES_URL)),
            DeleteCheck::Blocked { parent, dependents } => {
                tracing::warn!(
                    "Refusing to delete genre id={}: {} book(s) still reference it",
                    id,
                    dependents.len()
                );
                Ok(Page::Render(GenreDeleteView {
                    title: "Delete Genre".to_string(),
                    genre: parent,
                    genre_books: dependents,
                }))
            }
            DeleteCheck::Clear { .. } => {
                removed(self.store.genres_delete(id).await)?;
                tracing::info!("Deleted genre id={}", id);
                Ok(Page::redirect(GENRES_URL))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::AppError,
        models::{AuthorDraft, BookDraft, GenreDraft},
        repository::{CatalogStore, MemoryStore},
    };

    fn named(name: &str) -> FieldBag {
        FieldBag::new().with("name", name)
    }

    #[tokio::test]
    async fn test_duplicate_name_redirects_to_existing() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));

        let first = service.genre_create(named("Fantasy")).await.unwrap();
        let second = service.genre_create(named("  Fantasy ")).await.unwrap();

        assert_eq!(first.location(), second.location());
        let list = service.genre_list().await.unwrap().into_view().unwrap();
        assert_eq!(list.genre_list.len(), 1);
    }

    #[tokio::test]
    async fn test_short_name_rejected() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let view = service.genre_create(named("SF")).await.unwrap().into_view().unwrap();
        assert_eq!(view.genre.unwrap().name, "SF");
        assert_eq!(view.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let location = service
            .genre_create(named("Romanse"))
            .await
            .unwrap()
            .location()
            .unwrap()
            .to_string();
        let id: i32 = location.rsplit('/').next().unwrap().parse().unwrap();

        service.genre_update(id, named("Romance")).await.unwrap();

        let view = service.genre_detail(id).await.unwrap().into_view().unwrap();
        assert_eq!(view.genre.name, "Romance");
        assert!(matches!(service.genre_update_form(id + 1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_genre_in_use_is_not_removed() {
        let store = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store.clone());
        let genre = store
            .genres_create(&GenreDraft {
                name: "Horror".to_string(),
            })
            .await
            .unwrap();
        let author = store
            .authors_create(&AuthorDraft {
                first_name: "Mary".to_string(),
                family_name: "Shelley".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        store
            .books_create(&BookDraft {
                title: "Frankenstein".to_string(),
                author_id: author.id,
                summary: "A monster".to_string(),
                isbn: "9780486282114".to_string(),
                genre_ids: vec![genre.id],
            })
            .await
            .unwrap();

        let view = service.genre_delete(genre.id).await.unwrap().into_view().unwrap();

        assert_eq!(view.genre_books.len(), 1);
        assert!(store.genres_get(genre.id).await.unwrap().is_some());
    }
}

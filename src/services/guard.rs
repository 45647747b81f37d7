//! Dependent-record check run before any removal

use std::future::Future;

use super::aggregate::join2;
use crate::error::AppResult;

/// Whether a parent record may be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteCheck<P, C> {
    /// The parent does not exist; nothing to do
    Missing,
    /// Children still reference the parent. Nothing was changed.
    Blocked { parent: P, dependents: Vec<C> },
    /// No children reference the parent
    Clear { parent: P },
}

/// Fetch the parent and its dependents concurrently and classify the result.
/// Failure of either lookup is returned as is.
pub async fn check_dependents<P, C>(
    parent: impl Future<Output = AppResult<Option<P>>>,
    dependents: impl Future<Output = AppResult<Vec<C>>>,
) -> AppResult<DeleteCheck<P, C>> {
    let (parent, dependents) = join2(parent, dependents).await?;
    Ok(match parent {
        None => DeleteCheck::Missing,
        Some(parent) if dependents.is_empty() => DeleteCheck::Clear { parent },
        Some(parent) => DeleteCheck::Blocked { parent, dependents },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorDraft, BookDraft};
    use crate::repository::{CatalogStore, MemoryStore};

    fn author_draft(family_name: &str) -> AuthorDraft {
        AuthorDraft {
            first_name: "Test".to_string(),
            family_name: family_name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn book_draft(title: &str, author_id: i32) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            author_id,
            summary: "Summary".to_string(),
            isbn: "ISBN".to_string(),
            genre_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_author_without_books_is_clear() {
        let store = MemoryStore::new();
        let author = store.authors_create(&author_draft("Solo")).await.unwrap();

        let check = check_dependents(
            store.authors_get(author.id),
            store.books_by_author(author.id),
        )
        .await
        .unwrap();

        assert_eq!(check, DeleteCheck::Clear { parent: author });
    }

    #[tokio::test]
    async fn test_author_with_books_is_blocked() {
        let store = MemoryStore::new();
        let author = store.authors_create(&author_draft("Busy")).await.unwrap();
        let other = store.authors_create(&author_draft("Other")).await.unwrap();
        let first = store.books_create(&book_draft("First", author.id)).await.unwrap();
        let second = store.books_create(&book_draft("Second", author.id)).await.unwrap();
        store.books_create(&book_draft("Elsewhere", other.id)).await.unwrap();

        let check = check_dependents(
            store.authors_get(author.id),
            store.books_by_author(author.id),
        )
        .await
        .unwrap();

        match check {
            DeleteCheck::Blocked { parent, dependents } => {
                assert_eq!(parent, author);
                assert_eq!(dependents, vec![first, second]);
            }
            other => panic!("expected blocked, got {:?}", other),
        }
        assert_eq!(store.authors_get(author.id).await.unwrap(), Some(author));
    }

    #[tokio::test]
    async fn test_missing_parent() {
        let store = MemoryStore::new();
        let check = check_dependents(store.authors_get(99), store.books_by_author(99))
            .await
            .unwrap();
        assert_eq!(check, DeleteCheck::Missing);
    }
}

//! Book instance domain methods on Repository

use std::collections::HashMap;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceDetails, BookInstanceDraft, BookInstanceStatus},
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, status, due_back";

impl Repository {
    /// List all copies with their book
    pub async fn book_instances_list(&self) -> AppResult<Vec<BookInstanceDetails>> {
        let instances = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances ORDER BY id",
            INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut book_ids: Vec<i32> = instances.iter().map(|i| i.book_id).collect();
        book_ids.sort_unstable();
        book_ids.dedup();
        let books: HashMap<i32, _> = self
            .books_by_ids(&book_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(instances
            .into_iter()
            .map(|i| BookInstanceDetails {
                id: i.id,
                book: books.get(&i.book_id).cloned(),
                imprint: i.imprint,
                status: i.status,
                due_back: i.due_back,
            })
            .collect())
    }

    pub async fn book_instances_get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let instance = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(instance)
    }

    /// Get copy with its book loaded
    pub async fn book_instances_get_details(&self, id: i32) -> AppResult<Option<BookInstanceDetails>> {
        let Some(instance) = self.book_instances_get(id).await? else {
            return Ok(None);
        };
        let book = self.books_get(instance.book_id).await?;
        Ok(Some(BookInstanceDetails {
            id: instance.id,
            book,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
        }))
    }

    /// Copies referencing a book
    pub async fn book_instances_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY id",
            INSTANCE_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    pub async fn book_instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn book_instances_create(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let instance = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(draft.book_id)
        .bind(&draft.imprint)
        .bind(draft.status)
        .bind(draft.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(instance)
    }

    pub async fn book_instances_update(&self, id: i32, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let instance = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, status = $3, due_back = $4
            WHERE id = $5
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(draft.book_id)
        .bind(&draft.imprint)
        .bind(draft.status)
        .bind(draft.due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        Ok(instance)
    }

    pub async fn book_instances_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}

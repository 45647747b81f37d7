//! Book domain methods on Repository
//!
//! Genre references live in the `book_genres` junction table and are folded
//! back into `Book::genre_ids` on read.

use sqlx::{postgres::PgRow, Row};

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDetails, BookDraft, BookSummary, Genre},
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
           COALESCE(
               ARRAY_AGG(bg.genre_id ORDER BY bg.genre_id) FILTER (WHERE bg.genre_id IS NOT NULL),
               '{}'
           ) AS genre_ids
    FROM books b
    LEFT JOIN book_genres bg ON bg.book_id = b.id
"#;

const BOOK_GROUP: &str = "GROUP BY b.id ORDER BY b.title";

fn book_from_row(row: &PgRow) -> AppResult<Book> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author_id: row.try_get("author_id")?,
        summary: row.try_get("summary")?,
        isbn: row.try_get("isbn")?,
        genre_ids: row.try_get("genre_ids")?,
    })
}

fn sorted_genre_ids(draft: &BookDraft) -> Vec<i32> {
    let mut ids = draft.genre_ids.clone();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Repository {
    /// List all books ordered by title, with their author
    pub async fn books_list(&self) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title,
                   a.id AS author_pk, a.first_name, a.family_name, a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| -> AppResult<BookSummary> {
                let author_pk: Option<i32> = r.try_get("author_pk")?;
                let author = match author_pk {
                    Some(id) => Some(Author {
                        id,
                        first_name: r.try_get("first_name")?,
                        family_name: r.try_get("family_name")?,
                        date_of_birth: r.try_get("date_of_birth")?,
                        date_of_death: r.try_get("date_of_death")?,
                    }),
                    None => None,
                };
                Ok(BookSummary {
                    id: r.try_get("id")?,
                    title: r.try_get("title")?,
                    author,
                })
            })
            .collect()
    }

    /// Get book by ID
    pub async fn books_get(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.id = $1 {}", BOOK_SELECT, BOOK_GROUP);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(book_from_row).transpose()
    }

    /// Get book with its author and genres loaded
    pub async fn books_get_details(&self, id: i32) -> AppResult<Option<BookDetails>> {
        let Some(book) = self.books_get(id).await? else {
            return Ok(None);
        };

        let author = self.authors_get(book.author_id).await?;

        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(BookDetails {
            id: book.id,
            title: book.title,
            author,
            summary: book.summary,
            isbn: book.isbn,
            genres,
        }))
    }

    /// Books referencing an author
    pub async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let query = format!("{} WHERE b.author_id = $1 {}", BOOK_SELECT, BOOK_GROUP);
        let rows = sqlx::query(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(book_from_row).collect()
    }

    /// Books referencing a genre
    pub async fn books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let query = format!(
            "{} WHERE b.id IN (SELECT book_id FROM book_genres WHERE genre_id = $1) {}",
            BOOK_SELECT, BOOK_GROUP
        );
        let rows = sqlx::query(&query)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(book_from_row).collect()
    }

    /// Books by a set of IDs, ordered by title
    pub async fn books_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Book>> {
        let query = format!("{} WHERE b.id = ANY($1) {}", BOOK_SELECT, BOOK_GROUP);
        let rows = sqlx::query(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(book_from_row).collect()
    }

    pub async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a book and its genre links in one transaction
    pub async fn books_create(&self, draft: &BookDraft) -> AppResult<Book> {
        let genre_ids = sorted_genre_ids(draft);
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(draft.author_id)
        .bind(&draft.summary)
        .bind(&draft.isbn)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[])")
            .bind(id)
            .bind(&genre_ids[..])
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Book {
            id,
            title: draft.title.clone(),
            author_id: draft.author_id,
            summary: draft.summary.clone(),
            isbn: draft.isbn.clone(),
            genre_ids,
        })
    }

    /// Overwrite a book and replace its genre links
    pub async fn books_update(&self, id: i32, draft: &BookDraft) -> AppResult<Book> {
        let genre_ids = sorted_genre_ids(draft);
        let mut tx = self.pool.begin().await?;

        let updated: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4
            WHERE id = $5
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(draft.author_id)
        .bind(&draft.summary)
        .bind(&draft.isbn)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[])")
            .bind(id)
            .bind(&genre_ids[..])
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Book {
            id,
            title: draft.title.clone(),
            author_id: draft.author_id,
            summary: draft.summary.clone(),
            isbn: draft.isbn.clone(),
            genre_ids,
        })
    }

    /// Delete book (genre links cascade)
    pub async fn books_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

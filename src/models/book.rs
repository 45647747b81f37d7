//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Author, Genre, Record};

/// Book as stored, references unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    /// Genre references, no duplicates
    pub genre_ids: Vec<i32>,
}

impl Record for Book {
    fn id(&self) -> i32 {
        self.id
    }

    fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// List entry: title with its author resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    /// `None` when the referenced author no longer exists
    pub author: Option<Author>,
}

impl Record for BookSummary {
    fn id(&self) -> i32 {
        self.id
    }

    fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Book with author and genres resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: Option<Author>,
    pub summary: String,
    pub isbn: String,
    pub genres: Vec<Genre>,
}

impl Record for BookDetails {
    fn id(&self) -> i32 {
        self.id
    }

    fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}

/// Book form values as shown to the user. `author` and `genre` hold the
/// submitted references as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<String>,
}

impl From<&Book> for BookFields {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_ids.iter().map(i32::to_string).collect(),
        }
    }
}

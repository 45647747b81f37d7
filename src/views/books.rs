use serde::Serialize;

use super::{AuthorEntry, View};
use crate::{
    models::{Book, BookDetails, BookFields, BookInstance, BookSummary, Genre},
    services::{selection::Selectable, validation::Violation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookListView {
    pub title: String,
    pub book_list: Vec<BookSummary>,
}

impl View for BookListView {
    const NAME: &'static str = "book_list";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetailView {
    pub title: String,
    pub book: BookDetails,
    pub book_instances: Vec<BookInstance>,
}

impl View for BookDetailView {
    const NAME: &'static str = "book_detail";
}

/// Create and update form with the author choices and annotated genre
/// checkboxes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookFormView {
    pub title: String,
    pub authors: Vec<AuthorEntry>,
    pub genres: Vec<Selectable<Genre>>,
    pub book: Option<BookFields>,
    pub errors: Vec<Violation>,
}

impl View for BookFormView {
    const NAME: &'static str = "book_form";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDeleteView {
    pub title: String,
    pub book: Book,
    pub book_instances: Vec<BookInstance>,
}

impl View for BookDeleteView {
    const NAME: &'static str = "book_delete";
}

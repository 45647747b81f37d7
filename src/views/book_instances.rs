use serde::Serialize;

use super::View;
use crate::{
    models::{BookInstanceDetails, BookInstanceFields, BookInstanceStatus, BookSummary},
    services::{selection::Selectable, validation::Violation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceListView {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceDetails>,
}

impl View for BookInstanceListView {
    const NAME: &'static str = "bookinstance_list";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceDetailView {
    pub title: String,
    pub bookinstance: BookInstanceDetails,
}

impl View for BookInstanceDetailView {
    const NAME: &'static str = "bookinstance_detail";
}

/// Create and update form. The copy's book is the checked entry of
/// `book_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceFormView {
    pub title: String,
    pub book_list: Vec<Selectable<BookSummary>>,
    pub statuses: Vec<BookInstanceStatus>,
    pub bookinstance: Option<BookInstanceFields>,
    pub errors: Vec<Violation>,
}

impl View for BookInstanceFormView {
    const NAME: &'static str = "bookinstance_form";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceDeleteView {
    pub title: String,
    pub bookinstance: BookInstanceDetails,
}

impl View for BookInstanceDeleteView {
    const NAME: &'static str = "bookinstance_delete";
}

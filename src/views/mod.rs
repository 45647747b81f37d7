//! Named view documents handed to the presentation layer
//!
//! A view is a serializable data bag plus the name of the template that
//! renders it. Orchestrator operations return a [`Page`]: either a view to
//! render or a location to redirect to.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use indexmap::IndexMap;
use serde::Serialize;

pub use authors::{
    AuthorDeleteView, AuthorDetailView, AuthorEntry, AuthorFormView, AuthorListView,
};
pub use book_instances::{
    BookInstanceDeleteView, BookInstanceDetailView, BookInstanceFormView, BookInstanceListView,
};
pub use books::{BookDeleteView, BookDetailView, BookFormView, BookListView};
pub use genres::{GenreDeleteView, GenreDetailView, GenreFormView, GenreListView};

pub trait View: Serialize {
    /// Template name
    const NAME: &'static str;
}

/// Outcome of an orchestrated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<V> {
    Render(V),
    Redirect(String),
}

impl<V> Page<V> {
    pub fn redirect(location: impl Into<String>) -> Self {
        Page::Redirect(location.into())
    }

    pub fn into_view(self) -> Option<V> {
        match self {
            Page::Render(view) => Some(view),
            Page::Redirect(_) => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Page::Render(_) => None,
            Page::Redirect(location) => Some(location),
        }
    }
}

/// Home page summary counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexView {
    pub title: String,
    /// Set when the counts could not be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: IndexMap<&'static str, i64>,
}

impl View for IndexView {
    const NAME: &'static str = "index";
}

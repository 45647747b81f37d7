use serde::Serialize;

use super::View;
use crate::{
    models::{Book, Genre, GenreFields},
    services::validation::Violation,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreListView {
    pub title: String,
    pub genre_list: Vec<Genre>,
}

impl View for GenreListView {
    const NAME: &'static str = "genre_list";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreDetailView {
    pub title: String,
    pub genre: Genre,
    pub genre_books: Vec<Book>,
}

impl View for GenreDetailView {
    const NAME: &'static str = "genre_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreFormView {
    pub title: String,
    pub genre: Option<GenreFields>,
    pub errors: Vec<Violation>,
}

impl View for GenreFormView {
    const NAME: &'static str = "genre_form";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreDeleteView {
    pub title: String,
    pub genre: Genre,
    pub genre_books: Vec<Book>,
}

impl View for GenreDeleteView {
    const NAME: &'static str = "genre_delete";
}

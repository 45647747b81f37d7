use serde::Serialize;

use super::View;
use crate::{
    models::{Author, AuthorFields, Book, Record},
    services::validation::Violation,
};

/// Author record with the display values templates show for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    #[serde(flatten)]
    pub record: Author,
    /// Family name first
    pub name: String,
    pub lifespan: String,
    pub url: String,
}

impl From<Author> for AuthorEntry {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            url: author.url(),
            record: author,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorListView {
    pub title: String,
    pub author_list: Vec<AuthorEntry>,
}

impl View for AuthorListView {
    const NAME: &'static str = "author_list";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDetailView {
    pub title: String,
    pub author: AuthorEntry,
    pub author_books: Vec<Book>,
}

impl View for AuthorDetailView {
    const NAME: &'static str = "author_detail";
}

/// Create and update form. `author` is unset on an empty create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorFormView {
    pub title: String,
    pub author: Option<AuthorFields>,
    pub errors: Vec<Violation>,
}

impl View for AuthorFormView {
    const NAME: &'static str = "author_form";
}

/// Delete confirmation, listing the books that still block removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDeleteView {
    pub title: String,
    pub author: AuthorEntry,
    pub author_books: Vec<Book>,
}

impl View for AuthorDeleteView {
    const NAME: &'static str = "author_delete";
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_entry_serializes_display_values() {
        let entry = AuthorEntry::from(Author {
            id: 7,
            first_name: "Mary".to_string(),
            family_name: "Shelley".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1797, 8, 30),
            date_of_death: None,
        });

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["family_name"], "Shelley");
        assert_eq!(json["name"], "Shelley, Mary");
        assert_eq!(json["lifespan"], "1797-08-30 - ");
        assert_eq!(json["url"], "/catalog/author/7");
    }
}

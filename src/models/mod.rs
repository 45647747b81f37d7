//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod form;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorFields};
pub use book::{Book, BookDetails, BookDraft, BookFields, BookSummary};
pub use book_instance::{
    BookInstance, BookInstanceDetails, BookInstanceDraft, BookInstanceFields, BookInstanceStatus,
};
pub use form::{FieldBag, FieldValue};
pub use genre::{Genre, GenreDraft, GenreFields};

/// A stored catalog record with a stable identity and a canonical location
pub trait Record {
    fn id(&self) -> i32;

    /// Path under which the record's detail view is served
    fn url(&self) -> String;
}

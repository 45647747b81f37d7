//! Field rules for each catalog form and the drafts they produce

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::validation::{
    is_alphanumeric, is_book_instance_status, is_identity, is_iso8601_date, parse_identity,
    parse_iso8601_date, Checked, FieldRule, ValidationPipeline, Violation,
};
use crate::models::{
    AuthorDraft, AuthorFields, BookDraft, BookFields, BookInstanceDraft, BookInstanceFields,
    BookInstanceStatus, FieldBag, GenreDraft, GenreFields,
};

/// A submission that failed validation: the sanitized values to show again
/// and every violation found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<F> {
    pub fields: F,
    pub errors: Vec<Violation>,
}

pub type FormResult<D, F> = Result<D, Rejected<F>>;

fn finish<D, F>(
    checked: Checked,
    draft: impl FnOnce(&FieldBag) -> Option<D>,
    fields: impl FnOnce(&FieldBag) -> F,
) -> FormResult<D, F> {
    if checked.is_valid() {
        if let Some(draft) = draft(&checked.fields) {
            return Ok(draft);
        }
    }
    Err(Rejected {
        fields: fields(&checked.fields),
        errors: checked.violations,
    })
}

fn optional_date(value: &str) -> Option<Option<NaiveDate>> {
    if value.is_empty() {
        Some(None)
    } else {
        parse_iso8601_date(value).map(Some)
    }
}

fn has_three_chars(value: &str) -> bool {
    value.chars().count() >= 3
}

// Authors

pub fn author_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![
        FieldRule::new("first_name")
            .trim()
            .escape()
            .required("First name must be specified.")
            .check(is_alphanumeric, "First name has non-alphanumeric characters."),
        FieldRule::new("family_name")
            .trim()
            .escape()
            .required("Family name must be specified.")
            .check(is_alphanumeric, "Family name has non-alphanumeric characters."),
        FieldRule::new("date_of_birth")
            .optional()
            .check(is_iso8601_date, "Invalid date of birth"),
        FieldRule::new("date_of_death")
            .optional()
            .check(is_iso8601_date, "Invalid date of death"),
    ])
}

fn author_fields(fields: &FieldBag) -> AuthorFields {
    AuthorFields {
        first_name: fields.text("first_name"),
        family_name: fields.text("family_name"),
        date_of_birth: fields.text("date_of_birth"),
        date_of_death: fields.text("date_of_death"),
    }
}

pub fn validate_author(raw: &FieldBag) -> FormResult<AuthorDraft, AuthorFields> {
    finish(
        author_pipeline().run(raw),
        |fields| {
            Some(AuthorDraft {
                first_name: fields.text("first_name"),
                family_name: fields.text("family_name"),
                date_of_birth: optional_date(&fields.text("date_of_birth"))?,
                date_of_death: optional_date(&fields.text("date_of_death"))?,
            })
        },
        author_fields,
    )
}

// Books

/// Expects `genre` to be normalized to a sequence already
pub fn book_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![
        FieldRule::new("title")
            .trim()
            .escape()
            .required("Title must not be empty."),
        FieldRule::new("author")
            .trim()
            .escape()
            .required("Author must not be empty.")
            .check(is_identity, "Author reference is invalid."),
        FieldRule::new("summary")
            .trim()
            .escape()
            .required("Summary must not be empty."),
        FieldRule::new("isbn")
            .trim()
            .escape()
            .required("ISBN must not be empty"),
        FieldRule::each("genre")
            .escape()
            .check(is_identity, "Genre selection is invalid."),
    ])
}

fn book_fields(fields: &FieldBag) -> BookFields {
    BookFields {
        title: fields.text("title"),
        author: fields.text("author"),
        summary: fields.text("summary"),
        isbn: fields.text("isbn"),
        genre: fields.list("genre"),
    }
}

pub fn validate_book(raw: &FieldBag) -> FormResult<BookDraft, BookFields> {
    finish(
        book_pipeline().run(raw),
        |fields| {
            let mut genre_ids = fields
                .list("genre")
                .iter()
                .map(|id| parse_identity(id))
                .collect::<Option<Vec<_>>>()?;
            genre_ids.sort_unstable();
            genre_ids.dedup();
            Some(BookDraft {
                title: fields.text("title"),
                author_id: parse_identity(&fields.text("author"))?,
                summary: fields.text("summary"),
                isbn: fields.text("isbn"),
                genre_ids,
            })
        },
        book_fields,
    )
}

// Genres

pub fn genre_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![FieldRule::new("name")
        .trim()
        .escape()
        .check(has_three_chars, "Genre name must contain at least 3 characters.")])
}

pub fn validate_genre(raw: &FieldBag) -> FormResult<GenreDraft, GenreFields> {
    finish(
        genre_pipeline().run(raw),
        |fields| {
            Some(GenreDraft {
                name: fields.text("name"),
            })
        },
        |fields| GenreFields {
            name: fields.text("name"),
        },
    )
}

// Book instances

pub fn book_instance_pipeline() -> ValidationPipeline {
    ValidationPipeline::new(vec![
        FieldRule::new("book")
            .trim()
            .escape()
            .required("Book must be specified.")
            .check(is_identity, "Book reference is invalid."),
        FieldRule::new("imprint")
            .trim()
            .escape()
            .required("Imprint must be specified."),
        FieldRule::new("status")
            .trim()
            .escape()
            .optional()
            .check(is_book_instance_status, "Invalid status."),
        FieldRule::new("due_back")
            .optional()
            .check(is_iso8601_date, "Invalid date."),
    ])
}

fn book_instance_fields(fields: &FieldBag) -> BookInstanceFields {
    BookInstanceFields {
        book: fields.text("book"),
        imprint: fields.text("imprint"),
        status: fields.text("status"),
        due_back: fields.text("due_back"),
    }
}

/// Due date at midnight UTC, or now when left blank
fn due_back(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return Some(Utc::now());
    }
    let midnight = parse_iso8601_date(value)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Unset status falls back to [`BookInstanceStatus::Maintenance`]
pub fn validate_book_instance(raw: &FieldBag) -> FormResult<BookInstanceDraft, BookInstanceFields> {
    finish(
        book_instance_pipeline().run(raw),
        |fields| {
            let status = match fields.text("status").as_str() {
                "" => BookInstanceStatus::default(),
                status => status.parse().ok()?,
            };
            Some(BookInstanceDraft {
                book_id: parse_identity(&fields.text("book"))?,
                imprint: fields.text("imprint"),
                status,
                due_back: due_back(&fields.text("due_back"))?,
            })
        },
        book_instance_fields,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalize::normalize_selection;

    #[test]
    fn test_valid_author_is_trimmed_and_escaped() {
        let raw = FieldBag::new()
            .with("first_name", "  Ursula ")
            .with("family_name", "LeGuin")
            .with("date_of_birth", "1929-10-21")
            .with("date_of_death", "");

        let draft = validate_author(&raw).unwrap();

        assert_eq!(draft.first_name, "Ursula");
        assert_eq!(draft.family_name, "LeGuin");
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1929, 10, 21));
        assert_eq!(draft.date_of_death, None);
    }

    #[test]
    fn test_non_alphanumeric_names_keep_sanitized_values() {
        let raw = FieldBag::new()
            .with("first_name", "Jean-Luc")
            .with("family_name", "<Picard>");

        let rejected = validate_author(&raw).unwrap_err();

        assert_eq!(
            rejected.errors,
            vec![
                Violation::new("first_name", "First name has non-alphanumeric characters."),
                Violation::new("family_name", "Family name has non-alphanumeric characters."),
            ]
        );
        assert_eq!(rejected.fields.first_name, "Jean-Luc");
        assert_eq!(rejected.fields.family_name, "&lt;Picard&gt;");
    }

    #[test]
    fn test_author_bad_dates() {
        let raw = FieldBag::new()
            .with("first_name", "Ada")
            .with("family_name", "Lovelace")
            .with("date_of_birth", "10 Dec 1815")
            .with("date_of_death", "1852-13-27");

        let rejected = validate_author(&raw).unwrap_err();
        let messages: Vec<_> = rejected.errors.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["Invalid date of birth", "Invalid date of death"]);
    }

    #[test]
    fn test_author_dates_follow_iso8601_shapes() {
        let rejected = validate_author(
            &FieldBag::new()
                .with("first_name", "Ada")
                .with("family_name", "Lovelace")
                .with("date_of_birth", "1815-12-1")
                .with("date_of_death", " 1852-11-27"),
        )
        .unwrap_err();
        let fields: Vec<_> = rejected.errors.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["date_of_birth", "date_of_death"]);

        let draft = validate_author(
            &FieldBag::new()
                .with("first_name", "Ada")
                .with("family_name", "Lovelace")
                .with("date_of_birth", "18151210")
                .with("date_of_death", "1852"),
        )
        .unwrap();
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1815, 12, 10));
        assert_eq!(draft.date_of_death, NaiveDate::from_ymd_opt(1852, 1, 1));
    }

    #[test]
    fn test_book_without_title() {
        let mut raw = FieldBag::new()
            .with("title", "   ")
            .with("author", "4")
            .with("summary", "Spice & sand")
            .with("isbn", "978-0441013593")
            .with("genre", "2");
        normalize_selection(&mut raw, "genre");

        let rejected = validate_book(&raw).unwrap_err();

        assert_eq!(rejected.errors, vec![Violation::new("title", "Title must not be empty.")]);
        assert_eq!(rejected.fields.summary, "Spice &amp; sand");
        assert_eq!(rejected.fields.isbn, "978-0441013593");
        assert_eq!(rejected.fields.genre, vec!["2"]);
    }

    #[test]
    fn test_book_genres_collapse_duplicates() {
        let mut raw = FieldBag::new()
            .with("title", "Dune")
            .with("author", "4")
            .with("summary", "Desert planet")
            .with("isbn", "978-0441013593")
            .with("genre", vec!["5", "2", "5"]);
        normalize_selection(&mut raw, "genre");

        let draft = validate_book(&raw).unwrap();

        assert_eq!(draft.author_id, 4);
        assert_eq!(draft.genre_ids, vec![2, 5]);
    }

    #[test]
    fn test_book_without_genres_is_valid() {
        let mut raw = FieldBag::new()
            .with("title", "Dune")
            .with("author", "4")
            .with("summary", "Desert planet")
            .with("isbn", "978-0441013593");
        normalize_selection(&mut raw, "genre");

        assert!(validate_book(&raw).unwrap().genre_ids.is_empty());
    }

    #[test]
    fn test_book_rejects_malformed_references() {
        let mut raw = FieldBag::new()
            .with("title", "Dune")
            .with("author", "frank")
            .with("summary", "Desert planet")
            .with("isbn", "978-0441013593")
            .with("genre", vec!["1", "scifi"]);
        normalize_selection(&mut raw, "genre");

        let rejected = validate_book(&raw).unwrap_err();
        assert_eq!(
            rejected.errors,
            vec![
                Violation::new("author", "Author reference is invalid."),
                Violation::new("genre[1]", "Genre selection is invalid."),
            ]
        );
    }

    #[test]
    fn test_genre_name_length() {
        let rejected = validate_genre(&FieldBag::new().with("name", " SF ")).unwrap_err();
        assert_eq!(rejected.fields.name, "SF");
        assert_eq!(rejected.errors[0].message, "Genre name must contain at least 3 characters.");

        assert_eq!(
            validate_genre(&FieldBag::new().with("name", "Poetry")).unwrap().name,
            "Poetry"
        );
    }

    #[test]
    fn test_book_instance_defaults() {
        let before = Utc::now();
        let raw = FieldBag::new().with("book", "7").with("imprint", "Ace, 1990");

        let draft = validate_book_instance(&raw).unwrap();

        assert_eq!(draft.book_id, 7);
        assert_eq!(draft.status, BookInstanceStatus::Maintenance);
        assert!(draft.due_back >= before);
    }

    #[test]
    fn test_book_instance_explicit_values() {
        let raw = FieldBag::new()
            .with("book", "7")
            .with("imprint", "Ace, 1990")
            .with("status", "Loaned")
            .with("due_back", "2024-05-01");

        let draft = validate_book_instance(&raw).unwrap();

        assert_eq!(draft.status, BookInstanceStatus::Loaned);
        assert_eq!(draft.due_back, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_book_instance_violations() {
        let raw = FieldBag::new()
            .with("imprint", "")
            .with("status", "Lost")
            .with("due_back", "soon");

        let rejected = validate_book_instance(&raw).unwrap_err();
        let messages: Vec<_> = rejected.errors.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Book must be specified.",
                "Imprint must be specified.",
                "Invalid status.",
                "Invalid date.",
            ]
        );
        assert_eq!(rejected.fields.status, "Lost");
    }
}

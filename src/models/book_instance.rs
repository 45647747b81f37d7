//! Book instance (physical copy) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use std::str::FromStr;
use utoipa::ToSchema;

use super::{Book, Record};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown book instance status `{}`", s))
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as its text form, like the other catalog enums
impl sqlx::Type<Postgres> for BookInstanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookInstanceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookInstanceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

impl Record for BookInstance {
    fn id(&self) -> i32 {
        self.id
    }

    fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Book instance with its book resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInstanceDetails {
    pub id: i32,
    pub book: Option<Book>,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

impl Record for BookInstanceDetails {
    fn id(&self) -> i32 {
        self.id
    }

    fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

/// Book instance form values as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookInstanceFields {
    pub book: String,
    pub imprint: String,
    pub status: String,
    /// `yyyy-mm-dd`
    pub due_back: String,
}

impl From<&BookInstance> for BookInstanceFields {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book_id.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance.due_back.format("%Y-%m-%d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in BookInstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<BookInstanceStatus>(), Ok(status));
        }
        assert!("Lost".parse::<BookInstanceStatus>().is_err());
        assert_eq!(BookInstanceStatus::default(), BookInstanceStatus::Maintenance);
    }

    #[test]
    fn test_status_is_stored_as_text() {
        assert_eq!(
            <BookInstanceStatus as sqlx::Type<Postgres>>::type_info(),
            <String as sqlx::Type<Postgres>>::type_info()
        );
        let text = <String as sqlx::Type<Postgres>>::type_info();
        assert!(<BookInstanceStatus as sqlx::Type<Postgres>>::compatible(&text));
    }

    #[test]
    fn test_fields_format_due_back_as_date() {
        let instance = BookInstance {
            id: 9,
            book_id: 4,
            imprint: "Gollancz, 2011".to_string(),
            status: BookInstanceStatus::Loaned,
            due_back: Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
        };
        let fields = BookInstanceFields::from(&instance);
        assert_eq!(fields.book, "4");
        assert_eq!(fields.status, "Loaned");
        assert_eq!(fields.due_back, "2024-03-15");
    }
}

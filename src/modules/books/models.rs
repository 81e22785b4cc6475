use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Persisted book row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique identifier, generated by the store at creation time
    pub id: String,
    /// Title of the book; doubles as the lookup key for the API
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publication date
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
}

/// Request model for creating a new book.
///
/// `release_date` arrives as a raw string and is validated by the handler
/// before anything touches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub release_date: String,
}

/// Request model for replacing a book's fields.
///
/// The path parameter carries the current title; the replacement title
/// travels in the body as `newTitle`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBook {
    #[serde(rename = "newTitle")]
    pub new_title: String,
    pub author: String,
    pub release_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn book_serializes_release_date_as_rfc3339() {
        let book = Book {
            id: "b5c5f8f0-0000-4000-8000-000000000000".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            release_date: datetime!(1965-06-01 0:00 UTC),
        };

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["title"], "Dune");
        assert_eq!(json["release_date"], "1965-06-01T00:00:00Z");
    }

    #[test]
    fn create_book_deserializes_wire_payload() {
        let payload: CreateBook = serde_json::from_str(
            r#"{"title":"Dune","author":"Frank Herbert","release_date":"1965-06-01"}"#,
        )
        .unwrap();

        assert_eq!(payload.title, "Dune");
        assert_eq!(payload.author, "Frank Herbert");
        assert_eq!(payload.release_date, "1965-06-01");
    }

    #[test]
    fn update_book_reads_camel_case_new_title() {
        let payload: UpdateBook = serde_json::from_str(
            r#"{"newTitle":"Dune Messiah","author":"Frank Herbert","release_date":"1969-10-15"}"#,
        )
        .unwrap();

        assert_eq!(payload.new_title, "Dune Messiah");
    }
}

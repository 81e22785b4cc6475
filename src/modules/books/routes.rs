//! Route handlers for the books resource.

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use biblio_http::error::{ApiError, MessageBody};
use biblio_http::extract::AppJson;

use super::models::{Book, CreateBook, UpdateBook};
use super::store::BookStore;

pub(super) const NOT_FOUND_MESSAGE: &str = "Book not found";
pub(super) const ALREADY_AVAILABLE_MESSAGE: &str = "Book already available";
pub(super) const DELETED_MESSAGE: &str = "Book deleted successfully";
pub(super) const INVALID_DATE_MESSAGE: &str = "Invalid release date";

/// GET `/`: every book, ordered by title.
pub(super) async fn list_books(
    State(store): State<BookStore>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = store.list_all().await.context("failed to list books")?;
    Ok(Json(books))
}

/// POST `/`: create a book unless its title is already taken.
pub(super) async fn create_book(
    State(store): State<BookStore>,
    AppJson(payload): AppJson<CreateBook>,
) -> Result<Response, ApiError> {
    let release_date = parse_release_date(&payload.release_date)
        .ok_or_else(|| ApiError::validation(INVALID_DATE_MESSAGE))?;

    // Uniqueness rests on this prior read, not on a storage constraint;
    // two concurrent creates for the same title can both pass it.
    let existing = store
        .find_by_title(&payload.title)
        .await
        .context("failed to check for existing book")?;
    if existing.is_some() {
        return Err(ApiError::conflict(ALREADY_AVAILABLE_MESSAGE));
    }

    let book = store
        .create(&payload.title, &payload.author, release_date)
        .await
        .context("failed to create book")?;

    Ok((StatusCode::CREATED, Json(book)).into_response())
}

/// GET `/{title}`: fetch one book by its exact title.
pub(super) async fn get_book(
    State(store): State<BookStore>,
    Path(title): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = store
        .find_by_title(&title)
        .await
        .context("failed to look up book")?;

    match book {
        Some(book) => Ok(Json(book)),
        None => Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
    }
}

/// PUT `/{title}`: replace all fields of the matching book.
///
/// Responds with the bare affected-row count rather than the updated
/// entity, unlike POST/GET which return the Book itself.
pub(super) async fn update_book(
    State(store): State<BookStore>,
    Path(title): Path<String>,
    AppJson(payload): AppJson<UpdateBook>,
) -> Result<Json<u64>, ApiError> {
    let release_date = parse_release_date(&payload.release_date)
        .ok_or_else(|| ApiError::validation(INVALID_DATE_MESSAGE))?;

    let affected = store
        .update_by_title(&title, &payload.new_title, &payload.author, release_date)
        .await
        .context("failed to update book")?;

    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND_MESSAGE));
    }
    Ok(Json(affected))
}

/// DELETE `/{title}`: remove the matching book.
pub(super) async fn delete_book(
    State(store): State<BookStore>,
    Path(title): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    // Existence check and delete are separate statements, mirroring the
    // create path's check-then-act shape.
    let existing = store
        .find_by_title(&title)
        .await
        .context("failed to look up book")?;
    if existing.is_none() {
        return Err(ApiError::not_found(NOT_FOUND_MESSAGE));
    }

    store
        .delete_by_title(&title)
        .await
        .context("failed to delete book")?;

    Ok(Json(MessageBody::new(DELETED_MESSAGE)))
}

/// Parse a client-supplied release date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`, and bare
/// `YYYY-MM-DD` (taken as midnight UTC). Anything else is invalid.
fn parse_release_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }

    if let Ok(parsed) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Some(parsed.assume_utc());
    }

    if let Ok(parsed) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(parsed.midnight().assume_utc());
    }

    None
}

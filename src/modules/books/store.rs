use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use biblio_db::{Database, DbError};

use super::models::Book;

/// Persistence layer for books, backed by the shared connection pool.
///
/// Every operation is a single statement; callers compose their own
/// check-then-act sequences on top.
#[derive(Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// All books, ordered ascending by title.
    pub async fn list_all(&self) -> Result<Vec<Book>, DbError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, release_date FROM books ORDER BY title ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Look up a book by exact title match.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Book>, DbError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, release_date FROM books WHERE title = ?",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Insert a new book with a freshly generated id.
    pub async fn create(
        &self,
        title: &str,
        author: &str,
        release_date: OffsetDateTime,
    ) -> Result<Book, DbError> {
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            author: author.to_string(),
            release_date,
        };

        sqlx::query("INSERT INTO books (id, title, author, release_date) VALUES (?, ?, ?, ?)")
            .bind(&book.id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.release_date)
            .execute(&self.pool)
            .await?;

        Ok(book)
    }

    /// Replace the matching book's title, author, and release date.
    /// Returns the affected-row count; the id never changes.
    pub async fn update_by_title(
        &self,
        title: &str,
        new_title: &str,
        author: &str,
        release_date: OffsetDateTime,
    ) -> Result<u64, DbError> {
        let result =
            sqlx::query("UPDATE books SET title = ?, author = ?, release_date = ? WHERE title = ?")
                .bind(new_title)
                .bind(author)
                .bind(release_date)
                .bind(title)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Remove the matching book. Returns the affected-row count.
    pub async fn delete_by_title(&self, title: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM books WHERE title = ?")
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

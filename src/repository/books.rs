//! Books repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookWithAuthor},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, title: &str, author_id: i32) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author_id) VALUES ($1, $2) RETURNING id, title, author_id",
        )
        .bind(title)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookWithAuthor> {
        sqlx::query_as::<_, BookWithAuthor>(
            r#"
            SELECT b.id, b.title, b.author_id, a.name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// List books with their author, optionally searched and filtered
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<BookWithAuthor>> {
        let books = sqlx::query_as::<_, BookWithAuthor>(
            r#"
            SELECT b.id, b.title, b.author_id, a.name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%' OR a.name ILIKE '%' || $1 || '%')
              AND ($2::int IS NULL OR b.author_id = $2)
            ORDER BY b.title, b.id
            "#,
        )
        .bind(query.q.as_deref())
        .bind(query.author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Books whose author is `author_id`, filtered from the book side
    pub async fn by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id FROM books WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

//! Libraries repository (library rows and their book memberships)

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{book::BookWithAuthor, library::Library},
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Postgres>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a library with its initial books in one transaction
    pub async fn create(&self, name: &str, book_ids: &[i32]) -> AppResult<Library> {
        let mut tx = self.pool.begin().await?;

        let library = sqlx::query_as::<_, Library>(
            "INSERT INTO libraries (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        insert_books(&mut tx, library.id, book_ids).await?;
        tx.commit().await?;

        Ok(library)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Library> {
        sqlx::query_as::<_, Library>(
            "SELECT id, name FROM libraries WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library '{}' not found", name)))
    }

    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Library>> {
        let libraries = sqlx::query_as::<_, Library>(
            r#"
            SELECT id, name FROM libraries
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name, id
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(libraries)
    }

    /// Shelve books in a library; books already present are left as they are
    pub async fn add_books(&self, library_id: i32, book_ids: &[i32]) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_books(&mut conn, library_id, book_ids).await
    }

    pub async fn remove_book(&self, library_id: i32, book_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM library_books WHERE library_id = $1 AND book_id = $2")
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book {} is not in library {}",
                book_id, library_id
            )));
        }
        Ok(())
    }

    pub async fn books(&self, library_id: i32) -> AppResult<Vec<BookWithAuthor>> {
        let books = sqlx::query_as::<_, BookWithAuthor>(
            r#"
            SELECT b.id, b.title, b.author_id, a.name AS author_name
            FROM library_books lb
            JOIN books b ON b.id = lb.book_id
            JOIN authors a ON a.id = b.author_id
            WHERE lb.library_id = $1
            ORDER BY b.title, b.id
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM libraries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete a library, its memberships and its librarian
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM libraries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }
        Ok(())
    }
}

async fn insert_books(conn: &mut PgConnection, library_id: i32, book_ids: &[i32]) -> AppResult<()> {
    if book_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO library_books (library_id, book_id)
        SELECT $1, UNNEST($2::int[])
        ON CONFLICT (library_id, book_id) DO NOTHING
        "#,
    )
    .bind(library_id)
    .bind(book_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

//! Librarians repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::librarian::{Librarian, LibrarianWithLibrary},
};

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Postgres>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Assign a librarian; fails with a conflict when the library already has one
    pub async fn create(&self, name: &str, library_id: i32) -> AppResult<Librarian> {
        let librarian = sqlx::query_as::<_, Librarian>(
            "INSERT INTO librarians (name, library_id) VALUES ($1, $2) RETURNING id, name, library_id",
        )
        .bind(name)
        .bind(library_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(librarian)
    }

    pub async fn find_for_library(&self, library_id: i32) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>(
            "SELECT id, name, library_id FROM librarians WHERE library_id = $1",
        )
        .bind(library_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(librarian)
    }

    pub async fn get_for_library(&self, library_id: i32) -> AppResult<Librarian> {
        self.find_for_library(library_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No librarian for library {}", library_id)))
    }

    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<LibrarianWithLibrary>> {
        let librarians = sqlx::query_as::<_, LibrarianWithLibrary>(
            r#"
            SELECT l.id, l.name, l.library_id, lib.name AS library_name
            FROM librarians l
            JOIN libraries lib ON lib.id = l.library_id
            WHERE ($1::text IS NULL OR l.name ILIKE '%' || $1 || '%')
            ORDER BY l.name, l.id
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(librarians)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM librarians WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Librarian {} not found", id)));
        }
        Ok(())
    }
}

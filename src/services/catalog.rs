//! Catalog service: authors, books, libraries and librarians

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::{Book, BookQuery, BookWithAuthor, CreateBook},
        librarian::{CreateLibrarian, Librarian, LibrarianWithLibrary},
        library::{CreateLibrary, Library, LibraryDetail},
    },
    repository::Repository,
};

/// Trimmed value of a required text field; blank input is a validation error
fn required<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", field)));
    }
    Ok(value)
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Authors

    pub async fn create_author(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let name = required(&data.name, "Name")?;
        self.repository.authors.create(name).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn get_author_by_name(&self, name: &str) -> AppResult<Author> {
        self.repository.authors.get_by_name(name).await
    }

    pub async fn list_authors(&self, search: Option<&str>) -> AppResult<Vec<Author>> {
        self.repository.authors.list(search).await
    }

    /// Delete an author together with all of its books
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Deleted author and its books");
        Ok(())
    }

    // Books

    pub async fn create_book(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let title = required(&data.title, "Title")?;
        self.repository.books.create(title, data.author_id).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookWithAuthor> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.search(query).await
    }

    /// Books of an author, filtered on the book's author
    pub async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        self.repository.authors.get_by_id(author_id).await?;
        self.repository.books.by_author(author_id).await
    }

    /// Books of an author, followed from the author row
    pub async fn author_books(&self, author_id: i32) -> AppResult<Vec<Book>> {
        self.repository.authors.get_by_id(author_id).await?;
        self.repository.authors.books(author_id).await
    }

    pub async fn count_books(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // Libraries

    /// Create a library and shelve its books; nothing is stored if a book is missing
    pub async fn create_library(&self, data: &CreateLibrary) -> AppResult<Library> {
        data.validate()?;
        let name = required(&data.name, "Name")?;
        self.repository.libraries.create(name, &data.book_ids).await
    }

    pub async fn get_library(&self, id: i32) -> AppResult<Library> {
        self.repository.libraries.get_by_id(id).await
    }

    pub async fn get_library_by_name(&self, name: &str) -> AppResult<Library> {
        self.repository.libraries.get_by_name(name).await
    }

    pub async fn list_libraries(&self, search: Option<&str>) -> AppResult<Vec<Library>> {
        self.repository.libraries.list(search).await
    }

    pub async fn count_libraries(&self) -> AppResult<i64> {
        self.repository.libraries.count().await
    }

    pub async fn add_books_to_library(&self, library_id: i32, book_ids: &[i32]) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.libraries.add_books(library_id, book_ids).await?;
        self.repository.libraries.books(library_id).await
    }

    pub async fn remove_book_from_library(&self, library_id: i32, book_id: i32) -> AppResult<()> {
        self.repository.libraries.remove_book(library_id, book_id).await
    }

    pub async fn library_books(&self, library_id: i32) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.libraries.books(library_id).await
    }

    /// Library with its books and librarian
    pub async fn library_detail(&self, id: i32) -> AppResult<LibraryDetail> {
        let library = self.repository.libraries.get_by_id(id).await?;
        let books = self.repository.libraries.books(id).await?;
        let librarian = self.repository.librarians.find_for_library(id).await?;

        Ok(LibraryDetail {
            id: library.id,
            name: library.name,
            total_books: books.len() as i64,
            books,
            librarian,
        })
    }

    /// Delete a library together with its librarian
    pub async fn delete_library(&self, id: i32) -> AppResult<()> {
        self.repository.libraries.delete(id).await?;
        tracing::info!(library_id = id, "Deleted library and its librarian");
        Ok(())
    }

    // Librarians

    pub async fn create_librarian(&self, data: &CreateLibrarian) -> AppResult<Librarian> {
        data.validate()?;
        let name = required(&data.name, "Name")?;
        self.repository.libraries.get_by_id(data.library_id).await?;
        self.repository.librarians.create(name, data.library_id).await
    }

    pub async fn librarian_for_library(&self, library_id: i32) -> AppResult<Librarian> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.librarians.get_for_library(library_id).await
    }

    pub async fn list_librarians(&self, search: Option<&str>) -> AppResult<Vec<LibrarianWithLibrary>> {
        self.repository.librarians.list(search).await
    }

    pub async fn delete_librarian(&self, id: i32) -> AppResult<()> {
        self.repository.librarians.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  Harper Lee ", "Name").unwrap(), "Harper Lee");
    }

    #[test]
    fn test_required_rejects_blank() {
        for blank in ["", "   ", "\t\n"] {
            assert!(matches!(required(blank, "Title"), Err(AppError::Validation(_))));
        }
    }
}

//! Library model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::BookWithAuthor, librarian::Librarian};

/// Library row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Library with its books and librarian
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryDetail {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookWithAuthor>,
    pub total_books: i64,
    pub librarian: Option<Librarian>,
}

/// Create library request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLibrary {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    /// Books to shelve right away
    #[serde(default)]
    pub book_ids: Vec<i32>,
}

/// Add books to a library
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddBooks {
    pub book_ids: Vec<i32>,
}

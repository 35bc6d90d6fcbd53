//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
}

/// Book joined with its author's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookWithAuthor {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
}

impl std::fmt::Display for BookWithAuthor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.author_name)
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    pub author_id: i32,
}

/// Book changelist query (search on title and author name, filter on author)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Free text matched against title and author name
    pub q: Option<String>,
    pub author_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_author() {
        let book = BookWithAuthor {
            id: 3,
            title: "1984".to_string(),
            author_id: 2,
            author_name: "George Orwell".to_string(),
        };
        assert_eq!(book.to_string(), "1984 by George Orwell");
    }

    #[test]
    fn test_create_book_rejects_empty_title() {
        let book = CreateBook {
            title: String::new(),
            author_id: 1,
        };
        assert!(book.validate().is_err());
    }
}

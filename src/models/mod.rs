//! Data models for the library project

pub mod author;
pub mod book;
pub mod librarian;
pub mod library;
pub mod profile;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookWithAuthor};
pub use librarian::Librarian;
pub use library::{Library, LibraryDetail};
pub use profile::{CurrentUser, Role, UserProfile};
pub use user::{User, UserClaims};

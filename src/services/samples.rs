//! Sample catalog data and the relationship queries run against it

use crate::{
    error::{AppError, AppResult},
    models::{
        author::CreateAuthor,
        book::{Book, BookWithAuthor, CreateBook},
        librarian::{CreateLibrarian, Librarian},
        library::CreateLibrary,
    },
};

use super::catalog::CatalogService;

/// (author, titles)
const SAMPLE_BOOKS: &[(&str, &[&str])] = &[
    (
        "J.K. Rowling",
        &[
            "Harry Potter and the Philosopher's Stone",
            "Harry Potter and the Chamber of Secrets",
        ],
    ),
    ("George Orwell", &["1984", "Animal Farm"]),
    ("Harper Lee", &["To Kill a Mockingbird"]),
];

/// (library, shelved titles, librarian)
const SAMPLE_LIBRARIES: &[(&str, &[&str], &str)] = &[
    (
        "Central Public Library",
        &[
            "Harry Potter and the Philosopher's Stone",
            "Harry Potter and the Chamber of Secrets",
            "1984",
            "To Kill a Mockingbird",
        ],
        "Alice Johnson",
    ),
    (
        "University Library",
        &["1984", "Animal Farm", "To Kill a Mockingbird"],
        "Bob Smith",
    ),
];

/// Books of one author, queried both ways
#[derive(Debug)]
pub struct AuthorBooks {
    pub forward: Vec<Book>,
    pub reverse: Vec<Book>,
}

/// Insert the sample authors, books, libraries and librarians
pub async fn create_sample_data(catalog: &CatalogService) -> AppResult<()> {
    let mut books: Vec<Book> = Vec::new();

    for (author_name, titles) in SAMPLE_BOOKS {
        let author = catalog
            .create_author(&CreateAuthor {
                name: author_name.to_string(),
            })
            .await?;

        for title in titles.iter() {
            let book = catalog
                .create_book(&CreateBook {
                    title: title.to_string(),
                    author_id: author.id,
                })
                .await?;
            books.push(book);
        }
    }

    for (library_name, titles, librarian_name) in SAMPLE_LIBRARIES {
        let book_ids = books
            .iter()
            .filter(|b| titles.contains(&b.title.as_str()))
            .map(|b| b.id)
            .collect();

        let library = catalog
            .create_library(&CreateLibrary {
                name: library_name.to_string(),
                book_ids,
            })
            .await?;

        catalog
            .create_librarian(&CreateLibrarian {
                name: librarian_name.to_string(),
                library_id: library.id,
            })
            .await?;
    }

    tracing::info!("Sample data created");
    Ok(())
}

/// All books by the named author, via the book filter and via the author
pub async fn books_by_author(catalog: &CatalogService, author_name: &str) -> AppResult<AuthorBooks> {
    let author = catalog.get_author_by_name(author_name).await?;
    Ok(AuthorBooks {
        forward: catalog.books_by_author(author.id).await?,
        reverse: catalog.author_books(author.id).await?,
    })
}

/// All books shelved in the named library
pub async fn books_in_library(catalog: &CatalogService, library_name: &str) -> AppResult<Vec<BookWithAuthor>> {
    let library = catalog.get_library_by_name(library_name).await?;
    catalog.library_books(library.id).await
}

/// The librarian of one library, read from the library and looked up by library
#[derive(Debug)]
pub struct LibrarianLookup {
    pub direct: Librarian,
    pub alternative: Librarian,
}

/// The librarian of the named library
pub async fn librarian_for_library(catalog: &CatalogService, library_name: &str) -> AppResult<LibrarianLookup> {
    let library = catalog.get_library_by_name(library_name).await?;
    let direct = catalog
        .library_detail(library.id)
        .await?
        .librarian
        .ok_or_else(|| AppError::NotFound(format!("No librarian found for {}", library_name)))?;
    let alternative = catalog.librarian_for_library(library.id).await?;
    Ok(LibrarianLookup { direct, alternative })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelved_titles_exist() {
        let titles: Vec<&str> = SAMPLE_BOOKS.iter().flat_map(|(_, t)| t.iter().copied()).collect();
        assert_eq!(titles.len(), 5);
        for (_, shelved, _) in SAMPLE_LIBRARIES {
            assert!(shelved.iter().all(|t| titles.contains(t)));
        }
    }
}

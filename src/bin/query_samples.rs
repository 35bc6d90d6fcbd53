//! Creates the sample catalog and runs the relationship queries against it

use sqlx::postgres::PgPoolOptions;

use library_project::{
    config::AppConfig,
    logging,
    repository::Repository,
    services::{catalog::CatalogService, samples},
    AppError, AppResult,
};

const AUTHOR: &str = "George Orwell";
const LIBRARY: &str = "Central Public Library";
const LIBRARIAN_LIBRARY: &str = "University Library";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config.logging);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let catalog = CatalogService::new(Repository::new(pool));

    println!("Library relationship queries");
    println!("{}", "=".repeat(50));

    println!("Creating sample data...");
    samples::create_sample_data(&catalog).await?;
    println!("Sample data created successfully!");

    report(query_books_by_author(&catalog).await)?;
    report(query_books_in_library(&catalog).await)?;
    report(query_librarian_for_library(&catalog).await)?;

    println!("\n{}", "=".repeat(50));
    println!("All queries completed!");
    Ok(())
}

/// Print lookups that found nothing; anything else aborts the run
fn report(result: AppResult<()>) -> anyhow::Result<()> {
    match result {
        Err(AppError::NotFound(message)) => {
            println!("{}", message);
            Ok(())
        }
        other => Ok(other?),
    }
}

async fn query_books_by_author(catalog: &CatalogService) -> AppResult<()> {
    println!("\n=== QUERY 1: Books by a specific author ===");

    let books = samples::books_by_author(catalog, AUTHOR).await?;
    println!("Books by {}:", AUTHOR);
    for book in &books.forward {
        println!("  - {}", book.title);
    }

    println!("\nUsing reverse relationship:");
    for book in &books.reverse {
        println!("  - {}", book.title);
    }
    Ok(())
}

async fn query_books_in_library(catalog: &CatalogService) -> AppResult<()> {
    println!("\n=== QUERY 2: Books in a specific library ===");

    let books = samples::books_in_library(catalog, LIBRARY).await?;
    println!("Books in {}:", LIBRARY);
    for book in &books {
        println!("  - {}", book);
    }

    println!("\nTotal books: {}", books.len());
    Ok(())
}

async fn query_librarian_for_library(catalog: &CatalogService) -> AppResult<()> {
    println!("\n=== QUERY 3: Librarian for a specific library ===");

    let lookup = samples::librarian_for_library(catalog, LIBRARIAN_LIBRARY).await?;
    println!("Librarian for {}: {}", LIBRARIAN_LIBRARY, lookup.direct.name);
    println!("Alternative query result: {}", lookup.alternative.name);
    Ok(())
}

//! Database-backed tests for the catalog relations and the profile hook
//!
//! Each test gets a fresh database with the crate migrations applied.
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use sqlx::PgPool;

use library_project::{
    config::AuthConfig,
    error::AppError,
    models::{
        author::CreateAuthor,
        book::CreateBook,
        librarian::CreateLibrarian,
        library::CreateLibrary,
        profile::Role,
        user::{UpdateUser, UserFields},
    },
    repository::Repository,
    services::{catalog::CatalogService, samples, users::UsersService},
};

fn services(pool: PgPool) -> (Repository, CatalogService, UsersService) {
    let repository = Repository::new(pool);
    let catalog = CatalogService::new(repository.clone());
    let users = UsersService::new(repository.clone(), AuthConfig::default());
    (repository, catalog, users)
}

fn titles<T>(books: &[T], title: impl Fn(&T) -> &str) -> Vec<String> {
    let mut titles: Vec<String> = books.iter().map(|b| title(b).to_string()).collect();
    titles.sort();
    titles
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_new_user_gets_member_profile(pool: PgPool) {
    let (repository, _, users) = services(pool);

    let (user, profile) = users
        .create_user("reader@Example.org", Some("long enough"), UserFields::default())
        .await
        .unwrap();

    assert_eq!(user.email, "reader@example.org");
    assert_eq!(user.username, "reader");
    assert_eq!(profile.user_id, user.id);
    assert_eq!(profile.role, Role::Member);
    assert_eq!(repository.profiles.count_for_user(user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_saving_user_again_keeps_one_profile(pool: PgPool) {
    let (repository, _, users) = services(pool);
    let (user, _) = users
        .create_user("again@example.org", None, UserFields::default())
        .await
        .unwrap();

    let update = UpdateUser {
        first_name: Some("Ada".to_string()),
        ..Default::default()
    };
    let (updated, profile) = users.update_user(user.id, update).await.unwrap();

    assert_eq!(updated.first_name, "Ada");
    assert_eq!(profile.role, Role::Member);
    assert_eq!(repository.profiles.count_for_user(user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_concurrent_saves_keep_one_profile(pool: PgPool) {
    let (repository, _, users) = services(pool);
    let (user, _) = users
        .create_user("busy@example.org", None, UserFields::default())
        .await
        .unwrap();

    let (a, b, c) = tokio::join!(
        users.set_role(user.id, Role::Librarian),
        repository.users.touch_last_login(user.id),
        users.update_user(
            user.id,
            UpdateUser {
                last_name: Some("Busy".to_string()),
                ..Default::default()
            },
        ),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(repository.profiles.count_for_user(user.id).await.unwrap(), 1);
    let profile = repository.profiles.get_for_user(user.id).await.unwrap();
    assert_eq!(profile.role, Role::Librarian);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_role_change_persists(pool: PgPool) {
    let (repository, _, users) = services(pool);
    let (user, _) = users
        .create_user("promoted@example.org", None, UserFields::default())
        .await
        .unwrap();

    let (_, profile) = users.set_role(user.id, Role::Admin).await.unwrap();
    assert_eq!(profile.role, Role::Admin);

    // A later save without a role leaves the stored one alone
    users
        .update_user(
            user.id,
            UpdateUser {
                is_staff: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let current = users.current_user(user.id).await.unwrap();
    assert_eq!(current.role(), Some(Role::Admin));
    assert!(current.user.is_staff);
    assert_eq!(repository.profiles.count_for_user(user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_deleting_user_removes_profile(pool: PgPool) {
    let (repository, _, users) = services(pool);
    let (user, _) = users
        .create_user("gone@example.org", None, UserFields::default())
        .await
        .unwrap();

    users.delete_user(user.id).await.unwrap();

    assert_eq!(repository.profiles.count_for_user(user.id).await.unwrap(), 0);
    assert!(matches!(users.delete_user(user.id).await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    let (_, _, users) = services(pool);
    users
        .create_user("twin@example.org", None, UserFields::default())
        .await
        .unwrap();

    let result = users
        .create_user("twin@EXAMPLE.org", None, UserFields::default())
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_blank_email_is_rejected(pool: PgPool) {
    let (_, _, users) = services(pool);
    let result = users.create_user("", Some("long enough"), UserFields::default()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_superuser_flags(pool: PgPool) {
    let (_, _, users) = services(pool);

    let (admin, profile) = users
        .create_superuser("root@example.org", Some("long enough"), UserFields::default())
        .await
        .unwrap();
    assert!(admin.is_staff);
    assert!(admin.is_superuser);
    assert!(admin.is_active);
    assert_eq!(profile.role, Role::Member);

    let fields = UserFields {
        is_staff: Some(false),
        ..Default::default()
    };
    let result = users
        .create_superuser("half@example.org", Some("long enough"), fields)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_authenticate_stamps_last_login(pool: PgPool) {
    let (_, _, users) = services(pool);
    let (user, _) = users
        .create_user("login@example.org", Some("long enough"), UserFields::default())
        .await
        .unwrap();
    assert!(user.last_login.is_none());

    let (token, logged_in) = users
        .authenticate("login@EXAMPLE.ORG", "long enough")
        .await
        .unwrap();
    assert!(!token.is_empty());
    assert!(logged_in.last_login.is_some());

    let wrong = users.authenticate("login@example.org", "not the one").await;
    assert!(matches!(wrong, Err(AppError::Authentication(_))));

    let (no_password, _) = users
        .create_user("nopass@example.org", None, UserFields::default())
        .await
        .unwrap();
    let unusable = users.authenticate(&no_password.email, "").await;
    assert!(matches!(unusable, Err(AppError::Authentication(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_deleting_author_deletes_books(pool: PgPool) {
    let (repository, catalog, _) = services(pool);
    let author = catalog
        .create_author(&CreateAuthor {
            name: "Harper Lee".to_string(),
        })
        .await
        .unwrap();
    let book = catalog
        .create_book(&CreateBook {
            title: "To Kill a Mockingbird".to_string(),
            author_id: author.id,
        })
        .await
        .unwrap();
    let library = catalog
        .create_library(&CreateLibrary {
            name: "Branch".to_string(),
            book_ids: vec![book.id],
        })
        .await
        .unwrap();

    catalog.delete_author(author.id).await.unwrap();

    assert_eq!(repository.books.count().await.unwrap(), 0);
    assert!(matches!(catalog.get_book(book.id).await, Err(AppError::NotFound(_))));
    assert!(catalog.library_books(library.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_requires_existing_author(pool: PgPool) {
    let (_, catalog, _) = services(pool);
    let result = catalog
        .create_book(&CreateBook {
            title: "Orphan".to_string(),
            author_id: 9999,
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_library_books_and_count(pool: PgPool) {
    let (_, catalog, _) = services(pool);
    let author = catalog
        .create_author(&CreateAuthor {
            name: "Anonymous".to_string(),
        })
        .await
        .unwrap();

    let mut ids = Vec::new();
    for title in ["B1", "B2", "B3"] {
        let book = catalog
            .create_book(&CreateBook {
                title: title.to_string(),
                author_id: author.id,
            })
            .await
            .unwrap();
        ids.push(book.id);
    }

    let library = catalog
        .create_library(&CreateLibrary {
            name: "Central Public Library".to_string(),
            book_ids: ids.clone(),
        })
        .await
        .unwrap();

    // Adding a book twice leaves one membership
    let books = catalog.add_books_to_library(library.id, &ids[..1]).await.unwrap();
    assert_eq!(books.len(), 3);

    let found = samples::books_in_library(&catalog, "Central Public Library")
        .await
        .unwrap();
    assert_eq!(titles(&found, |b| &b.title), vec!["B1", "B2", "B3"]);
    assert!(found.iter().all(|b| b.author_name == "Anonymous"));

    let detail = catalog.library_detail(library.id).await.unwrap();
    assert_eq!(detail.total_books, 3);
    assert!(detail.librarian.is_none());

    catalog.remove_book_from_library(library.id, ids[0]).await.unwrap();
    assert_eq!(catalog.library_detail(library.id).await.unwrap().total_books, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_one_librarian_per_library(pool: PgPool) {
    let (repository, catalog, _) = services(pool);
    let library = catalog
        .create_library(&CreateLibrary {
            name: "University Library".to_string(),
            book_ids: Vec::new(),
        })
        .await
        .unwrap();

    let alice = catalog
        .create_librarian(&CreateLibrarian {
            name: "Alice".to_string(),
            library_id: library.id,
        })
        .await
        .unwrap();
    assert_eq!(catalog.librarian_for_library(library.id).await.unwrap(), alice);

    let second = catalog
        .create_librarian(&CreateLibrarian {
            name: "Bob".to_string(),
            library_id: library.id,
        })
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    catalog.delete_library(library.id).await.unwrap();
    assert!(repository
        .librarians
        .find_for_library(library.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_sample_queries(pool: PgPool) {
    let (_, catalog, _) = services(pool);
    samples::create_sample_data(&catalog).await.unwrap();

    let orwell = samples::books_by_author(&catalog, "George Orwell").await.unwrap();
    assert_eq!(titles(&orwell.forward, |b| &b.title), vec!["1984", "Animal Farm"]);
    assert_eq!(titles(&orwell.reverse, |b| &b.title), vec!["1984", "Animal Farm"]);

    let central = samples::books_in_library(&catalog, "Central Public Library")
        .await
        .unwrap();
    assert_eq!(central.len(), 4);

    let university = samples::librarian_for_library(&catalog, "University Library")
        .await
        .unwrap();
    assert_eq!(university.direct.name, "Bob Smith");
    assert_eq!(university.alternative, university.direct);

    let central = samples::librarian_for_library(&catalog, "Central Public Library")
        .await
        .unwrap();
    assert_eq!(central.direct.name, "Alice Johnson");

    let missing = samples::books_by_author(&catalog, "Nobody").await;
    match missing {
        Err(AppError::NotFound(message)) => assert_eq!(message, "Author 'Nobody' not found"),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_blank_catalog_names_are_rejected(pool: PgPool) {
    let (repository, catalog, _) = services(pool);

    let author = catalog
        .create_author(&CreateAuthor {
            name: "   ".to_string(),
        })
        .await;
    assert!(matches!(author, Err(AppError::Validation(_))));
    assert!(catalog.list_authors(None).await.unwrap().is_empty());

    let author = catalog
        .create_author(&CreateAuthor {
            name: "  Jane Austen ".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(author.name, "Jane Austen");

    let book = catalog
        .create_book(&CreateBook {
            title: "\t".to_string(),
            author_id: author.id,
        })
        .await;
    assert!(matches!(book, Err(AppError::Validation(_))));
    assert_eq!(catalog.count_books().await.unwrap(), 0);

    let library = catalog
        .create_library(&CreateLibrary {
            name: "  ".to_string(),
            book_ids: Vec::new(),
        })
        .await;
    assert!(matches!(library, Err(AppError::Validation(_))));
    assert_eq!(catalog.count_libraries().await.unwrap(), 0);

    let library = catalog
        .create_library(&CreateLibrary {
            name: "Branch".to_string(),
            book_ids: Vec::new(),
        })
        .await
        .unwrap();
    let librarian = catalog
        .create_librarian(&CreateLibrarian {
            name: " ".to_string(),
            library_id: library.id,
        })
        .await;
    assert!(matches!(librarian, Err(AppError::Validation(_))));
    assert!(repository
        .librarians
        .find_for_library(library.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_failed_library_create_leaves_nothing(pool: PgPool) {
    let (_, catalog, _) = services(pool);

    let result = catalog
        .create_library(&CreateLibrary {
            name: "Ghost Branch".to_string(),
            book_ids: vec![424242],
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(catalog.count_libraries().await.unwrap(), 0);
    assert!(matches!(
        catalog.get_library_by_name("Ghost Branch").await,
        Err(AppError::NotFound(_))
    ));
}

//! Admin surface: changelists and edits for every registered model, staff only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    admin::{AdminSite, UserAdminRow},
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::{Book, BookQuery, BookWithAuthor, CreateBook},
        librarian::{CreateLibrarian, Librarian, LibrarianWithLibrary},
        library::{AddBooks, CreateLibrary, Library},
        profile::{UpdateRole, UserProfile, UserProfileQuery, UserProfileWithUser},
        user::{CreateUser, UpdateUser, User, UserQuery},
    },
    AppState,
};

use super::{require_staff, AuthenticatedUser};

/// Free text search on a changelist
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Staff and superuser flags may only be handed out by a superuser
fn ensure_superuser(caller: &User, needed: bool) -> AppResult<()> {
    if needed && !caller.is_superuser {
        return Err(AppError::Authorization(
            "Superuser privileges required".to_string(),
        ));
    }
    Ok(())
}

/// A user saved through the admin, with its synced profile
#[derive(Serialize, ToSchema)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: UserProfile,
}

/// Admin index: site headings and registered models
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin site", body = AdminSite),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn index(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminSite>> {
    require_staff(&state, &claims).await?;
    Ok(Json(state.admin.as_ref().clone()))
}

// Authors

#[utoipa::path(
    get,
    path = "/admin/authors",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Author changelist", body = Vec<Author>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Author>>> {
    require_staff(&state, &claims).await?;
    let authors = state.services.catalog.list_authors(query.q.as_deref()).await?;
    Ok(Json(authors))
}

#[utoipa::path(
    post,
    path = "/admin/authors",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    require_staff(&state, &claims).await?;
    let author = state.services.catalog.create_author(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Delete an author; its books go with it
#[utoipa::path(
    delete,
    path = "/admin/authors/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Books

#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Book changelist", body = Vec<BookWithAuthor>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookWithAuthor>>> {
    require_staff(&state, &claims).await?;
    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    require_staff(&state, &claims).await?;
    let book = state.services.catalog.create_book(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Libraries

#[utoipa::path(
    get,
    path = "/admin/libraries",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Library changelist", body = Vec<Library>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_libraries(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Library>>> {
    require_staff(&state, &claims).await?;
    let libraries = state.services.catalog.list_libraries(query.q.as_deref()).await?;
    Ok(Json(libraries))
}

#[utoipa::path(
    post,
    path = "/admin/libraries",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    require_staff(&state, &claims).await?;
    let library = state.services.catalog.create_library(&data).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Delete a library; its memberships and librarian go with it
#[utoipa::path(
    delete,
    path = "/admin/libraries/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state.services.catalog.delete_library(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shelve books in a library; books already present are left alone
#[utoipa::path(
    post,
    path = "/admin/libraries/{id}/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    request_body = AddBooks,
    responses(
        (status = 200, description = "Books now in the library", body = Vec<BookWithAuthor>),
        (status = 404, description = "Library or book not found")
    )
)]
pub async fn add_library_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AddBooks>,
) -> AppResult<Json<Vec<BookWithAuthor>>> {
    require_staff(&state, &claims).await?;
    let books = state
        .services
        .catalog
        .add_books_to_library(id, &data.book_ids)
        .await?;
    Ok(Json(books))
}

#[utoipa::path(
    delete,
    path = "/admin/libraries/{id}/books/{book_id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book removed from the library"),
        (status = 404, description = "Book not in the library")
    )
)]
pub async fn remove_library_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, book_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state
        .services
        .catalog
        .remove_book_from_library(id, book_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Librarians

#[utoipa::path(
    get,
    path = "/admin/librarians",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Librarian changelist", body = Vec<LibrarianWithLibrary>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_librarians(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<LibrarianWithLibrary>>> {
    require_staff(&state, &claims).await?;
    let librarians = state.services.catalog.list_librarians(query.q.as_deref()).await?;
    Ok(Json(librarians))
}

#[utoipa::path(
    post,
    path = "/admin/librarians",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateLibrarian,
    responses(
        (status = 201, description = "Librarian created", body = Librarian),
        (status = 404, description = "Library not found"),
        (status = 409, description = "Library already has a librarian")
    )
)]
pub async fn create_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLibrarian>,
) -> AppResult<(StatusCode, Json<Librarian>)> {
    require_staff(&state, &claims).await?;
    let librarian = state.services.catalog.create_librarian(&data).await?;
    Ok((StatusCode::CREATED, Json(librarian)))
}

#[utoipa::path(
    delete,
    path = "/admin/librarians/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Librarian ID")),
    responses(
        (status = 204, description = "Librarian deleted"),
        (status = 404, description = "Librarian not found")
    )
)]
pub async fn delete_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state.services.catalog.delete_librarian(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// User profiles

#[utoipa::path(
    get,
    path = "/admin/userprofiles",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(UserProfileQuery),
    responses(
        (status = 200, description = "Profile changelist", body = Vec<UserProfileWithUser>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserProfileQuery>,
) -> AppResult<Json<Vec<UserProfileWithUser>>> {
    require_staff(&state, &claims).await?;
    let profiles = state.services.repository.profiles.list_with_users(&query).await?;
    Ok(Json(profiles))
}

/// Change a user's role; saved together with the user
#[utoipa::path(
    put,
    path = "/admin/userprofiles/{user_id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile_role(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(data): Json<UpdateRole>,
) -> AppResult<Json<UserProfile>> {
    let staff = require_staff(&state, &claims).await?;
    let (_, profile) = state.services.users.set_role(user_id, data.role).await?;

    tracing::info!(user_id, role = %profile.role, by = staff.user.id, "Role changed");
    Ok(Json(profile))
}

// Users

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "User changelist", body = Vec<UserAdminRow>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<UserAdminRow>>> {
    require_staff(&state, &claims).await?;
    let today = Utc::now().date_naive();
    let rows = state
        .services
        .users
        .search_users(&query)
        .await?
        .iter()
        .map(|user| UserAdminRow::new(user, today, &state.admin.media_url))
        .collect();
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserWithProfile),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Staff or superuser flags need superuser privileges"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserWithProfile>)> {
    let staff = require_staff(&state, &claims).await?;
    ensure_superuser(&staff.user, data.fields.grants_privileges())?;
    data.validate()?;
    let (user, profile) = state
        .services
        .users
        .create_user(&data.email, data.password.as_deref(), data.fields)
        .await?;
    Ok((StatusCode::CREATED, Json(UserWithProfile { user, profile })))
}

/// Create a superuser; staff and superuser flags default to true
#[utoipa::path(
    post,
    path = "/admin/users/superuser",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "Superuser created", body = UserWithProfile),
        (status = 400, description = "Inconsistent flags or invalid input"),
        (status = 403, description = "Superuser privileges required"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_superuser(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserWithProfile>)> {
    let staff = require_staff(&state, &claims).await?;
    ensure_superuser(&staff.user, true)?;
    data.validate()?;
    let (user, profile) = state
        .services
        .users
        .create_superuser(&data.email, data.password.as_deref(), data.fields)
        .await?;
    Ok((StatusCode::CREATED, Json(UserWithProfile { user, profile })))
}

/// Update a user; a `role` in the body is saved to its profile
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserWithProfile),
        (status = 403, description = "Staff or superuser flags need superuser privileges"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateUser>,
) -> AppResult<Json<UserWithProfile>> {
    let staff = require_staff(&state, &claims).await?;
    ensure_superuser(&staff.user, data.changes_privileges())?;
    let (user, profile) = state.services.users.update_user(id, data).await?;
    Ok(Json(UserWithProfile { user, profile }))
}

/// Delete a user; its profile goes with it
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_staff(&state, &claims).await?;
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

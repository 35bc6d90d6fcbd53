//! Book list view

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookQuery, BookWithAuthor},
    AppState,
};

use super::AuthenticatedUser;

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<BookWithAuthor>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookWithAuthor>>> {
    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

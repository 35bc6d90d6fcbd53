//! Library detail view

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::library::LibraryDetail, AppState};

use super::AuthenticatedUser;

/// Library with its books and librarian
#[utoipa::path(
    get,
    path = "/libraries/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library ID")
    ),
    responses(
        (status = 200, description = "Library details", body = LibraryDetail),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn library_detail(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LibraryDetail>> {
    let library = state.services.catalog.library_detail(id).await?;
    Ok(Json(library))
}

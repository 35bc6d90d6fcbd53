//! Role dashboards, each gated by its role predicate

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::profile::{is_admin, is_librarian, is_member, Role},
    services::dashboards::{AdminDashboard, CatalogDashboard},
    AppState,
};

use super::{require_role, AuthenticatedUser};

/// Admin dashboard: every profile and catalog totals
#[utoipa::path(
    get,
    path = "/dashboard/admin",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboard),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn admin_view(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminDashboard>> {
    require_role(&state, &claims, is_admin, "Admin role required").await?;
    let dashboard = state.services.dashboards.admin(Role::Admin).await?;
    Ok(Json(dashboard))
}

/// Librarian dashboard
#[utoipa::path(
    get,
    path = "/dashboard/librarian",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Librarian dashboard", body = CatalogDashboard),
        (status = 403, description = "Librarian role required")
    )
)]
pub async fn librarian_view(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CatalogDashboard>> {
    require_role(&state, &claims, is_librarian, "Librarian role required").await?;
    let dashboard = state.services.dashboards.catalog(Role::Librarian).await?;
    Ok(Json(dashboard))
}

/// Member dashboard
#[utoipa::path(
    get,
    path = "/dashboard/member",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member dashboard", body = CatalogDashboard),
        (status = 403, description = "Member role required")
    )
)]
pub async fn member_view(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CatalogDashboard>> {
    require_role(&state, &claims, is_member, "Member role required").await?;
    let dashboard = state.services.dashboards.catalog(Role::Member).await?;
    Ok(Json(dashboard))
}

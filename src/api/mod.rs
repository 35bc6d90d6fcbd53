//! API handlers for the library REST endpoints

pub mod admin;
pub mod auth;
pub mod books;
pub mod dashboards;
pub mod health;
pub mod libraries;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    error::AppError,
    models::{profile::CurrentUser, user::UserClaims},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Load the caller with its profile and check it against a role predicate
pub(crate) async fn require_role(
    state: &AppState,
    claims: &UserClaims,
    predicate: fn(&CurrentUser) -> bool,
    denied: &str,
) -> Result<CurrentUser, AppError> {
    let current = state.services.users.current_user(claims.user_id).await?;
    if !predicate(&current) {
        tracing::debug!(user_id = claims.user_id, role = ?current.role(), "Role check failed");
        return Err(AppError::Authorization(denied.to_string()));
    }
    Ok(current)
}

/// The admin surface is reserved to active staff accounts
pub(crate) async fn require_staff(state: &AppState, claims: &UserClaims) -> Result<CurrentUser, AppError> {
    require_role(state, claims, |u| u.user.is_staff, "Staff privileges required").await
}

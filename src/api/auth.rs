//! Authentication and self-registration endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        profile::{CurrentUser, UserProfile},
        user::{RegisterUser, User},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// One input of the registration form
#[derive(Serialize, ToSchema)]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// Input type: "email", "text", "password" or "date"
    pub input: String,
    pub required: bool,
}

/// Registration form description
#[derive(Serialize, ToSchema)]
pub struct RegisterForm {
    pub fields: Vec<FormField>,
}

/// Registration response; the new account is already logged in
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
    pub profile: UserProfile,
}

fn field(name: &str, label: &str, input: &str, required: bool) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        input: input.to_string(),
        required,
    }
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Get current user with its profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CurrentUser>> {
    let current = state.services.users.current_user(claims.user_id).await?;
    Ok(Json(current))
}

/// Describe the registration form
#[utoipa::path(
    get,
    path = "/register",
    tag = "auth",
    responses(
        (status = 200, description = "Registration form", body = RegisterForm)
    )
)]
pub async fn register_form() -> Json<RegisterForm> {
    Json(RegisterForm {
        fields: vec![
            field("email", "Email", "email", true),
            field("username", "Username", "text", true),
            field("first_name", "First name", "text", false),
            field("last_name", "Last name", "text", false),
            field("date_of_birth", "Date of birth", "date", false),
            field("password1", "Password", "password", true),
            field("password2", "Password confirmation", "password", true),
        ],
    })
}

/// Register a new account and log it in
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (token, user, profile) = state.services.users.register(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            token_type: "Bearer".to_string(),
            user,
            profile,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_lists_password_pair() {
        let Json(form) = tokio_test::block_on(register_form());
        let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"email"));
        assert!(names.contains(&"password1"));
        assert!(names.contains(&"password2"));
        assert!(form
            .fields
            .iter()
            .filter(|f| f.input == "password")
            .all(|f| f.required));
    }
}

//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, dashboards, health, libraries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Project API",
        version = "1.0.0",
        description = "Authors, books, libraries and role-based accounts"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::register_form,
        auth::register,
        // Catalog
        books::list_books,
        libraries::library_detail,
        // Dashboards
        dashboards::admin_view,
        dashboards::librarian_view,
        dashboards::member_view,
        // Admin
        admin::index,
        admin::list_authors,
        admin::create_author,
        admin::delete_author,
        admin::list_books,
        admin::create_book,
        admin::delete_book,
        admin::list_libraries,
        admin::create_library,
        admin::delete_library,
        admin::add_library_books,
        admin::remove_library_book,
        admin::list_librarians,
        admin::create_librarian,
        admin::delete_librarian,
        admin::list_profiles,
        admin::update_profile_role,
        admin::list_users,
        admin::create_user,
        admin::create_superuser,
        admin::update_user,
        admin::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::FormField,
            auth::RegisterForm,
            auth::RegisterResponse,
            // Catalog
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::book::Book,
            crate::models::book::BookWithAuthor,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::library::Library,
            crate::models::library::LibraryDetail,
            crate::models::library::CreateLibrary,
            crate::models::library::AddBooks,
            crate::models::librarian::Librarian,
            crate::models::librarian::LibrarianWithLibrary,
            crate::models::librarian::CreateLibrarian,
            // Users
            crate::models::user::User,
            crate::models::user::UserFields,
            crate::models::user::CreateUser,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateUser,
            crate::models::user::UserQuery,
            crate::models::profile::Role,
            crate::models::profile::UserProfile,
            crate::models::profile::UserProfileWithUser,
            crate::models::profile::UserProfileQuery,
            crate::models::profile::UpdateRole,
            crate::models::profile::CurrentUser,
            // Dashboards
            crate::services::dashboards::AdminDashboard,
            crate::services::dashboards::CatalogDashboard,
            // Admin
            crate::admin::AdminSite,
            crate::admin::ModelAdmin,
            crate::admin::UserAdminRow,
            admin::SearchQuery,
            admin::UserWithProfile,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, registration and current user"),
        (name = "catalog", description = "Books and libraries"),
        (name = "dashboards", description = "Role dashboards"),
        (name = "admin", description = "Staff administration")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

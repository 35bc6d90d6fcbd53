//! Library Project server
//!
//! JSON API over authors, books, libraries and librarians, with role dashboards
//! and a staff admin surface.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use library_project::{api, config::AppConfig, logging, repository::Repository, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Keep the guard alive so the file writer flushes on shutdown
    let _log_guard = logging::init(&config.logging);

    tracing::info!("Starting Library Project v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState::new(config, Repository::new(pool));
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/", get(api::admin::index))
        .route("/authors", get(api::admin::list_authors).post(api::admin::create_author))
        .route("/authors/:id", delete(api::admin::delete_author))
        .route("/books", get(api::admin::list_books).post(api::admin::create_book))
        .route("/books/:id", delete(api::admin::delete_book))
        .route("/libraries", get(api::admin::list_libraries).post(api::admin::create_library))
        .route("/libraries/:id", delete(api::admin::delete_library))
        .route("/libraries/:id/books", post(api::admin::add_library_books))
        .route("/libraries/:id/books/:book_id", delete(api::admin::remove_library_book))
        .route("/librarians", get(api::admin::list_librarians).post(api::admin::create_librarian))
        .route("/librarians/:id", delete(api::admin::delete_librarian))
        .route("/userprofiles", get(api::admin::list_profiles))
        .route("/userprofiles/:user_id", put(api::admin::update_profile_role))
        .route("/users", get(api::admin::list_users).post(api::admin::create_user))
        .route("/users/superuser", post(api::admin::create_superuser))
        .route("/users/:id", put(api::admin::update_user).delete(api::admin::delete_user));

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/register", get(api::auth::register_form).post(api::auth::register))
        // Catalog
        .route("/books", get(api::books::list_books))
        .route("/libraries/:id", get(api::libraries::library_detail))
        // Dashboards
        .route("/dashboard/admin", get(api::dashboards::admin_view))
        .route("/dashboard/librarian", get(api::dashboards::librarian_view))
        .route("/dashboard/member", get(api::dashboards::member_view))
        .nest("/admin", admin)
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

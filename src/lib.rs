//! Library project server
//!
//! Authors, books, libraries and librarians, with role-based user accounts
//! (Admin, Librarian, Member) served over a JSON API.

use std::sync::Arc;

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub admin: Arc<admin::AdminSite>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, config.auth.clone());
        let admin = admin::AdminSite::new(&config.admin);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            admin: Arc::new(admin),
        }
    }
}

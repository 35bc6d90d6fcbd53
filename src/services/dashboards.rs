//! Role dashboards

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{BookQuery, BookWithAuthor},
        library::Library,
        profile::{Role, UserProfileQuery, UserProfileWithUser},
    },
    repository::Repository,
};

/// Admin dashboard content
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub users: Vec<UserProfileWithUser>,
    pub total_books: i64,
    pub total_libraries: i64,
    pub user_role: Role,
}

/// Librarian and member dashboard content
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogDashboard {
    pub books: Vec<BookWithAuthor>,
    pub libraries: Vec<Library>,
    pub user_role: Role,
}

#[derive(Clone)]
pub struct DashboardsService {
    repository: Repository,
}

impl DashboardsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn admin(&self, role: Role) -> AppResult<AdminDashboard> {
        Ok(AdminDashboard {
            users: self
                .repository
                .profiles
                .list_with_users(&UserProfileQuery::default())
                .await?,
            total_books: self.repository.books.count().await?,
            total_libraries: self.repository.libraries.count().await?,
            user_role: role,
        })
    }

    /// Shared by the librarian and member dashboards
    pub async fn catalog(&self, role: Role) -> AppResult<CatalogDashboard> {
        Ok(CatalogDashboard {
            books: self.repository.books.search(&BookQuery::default()).await?,
            libraries: self.repository.libraries.list(None).await?,
            user_role: role,
        })
    }
}

//! Admin site: headings and per-model changelist options

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::AdminSiteConfig, models::user::User};

/// Changelist options of one registered model
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelAdmin {
    /// URL segment under `/admin`
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub verbose_name_plural: &'static str,
    #[schema(value_type = Vec<String>)]
    pub list_display: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub search_fields: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub list_filter: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub ordering: &'static [&'static str],
}

const REGISTERED: &[ModelAdmin] = &[
    ModelAdmin {
        name: "authors",
        verbose_name_plural: "Authors",
        list_display: &["name"],
        search_fields: &["name"],
        list_filter: &[],
        ordering: &["name"],
    },
    ModelAdmin {
        name: "books",
        verbose_name_plural: "Books",
        list_display: &["title", "author"],
        search_fields: &["title", "author__name"],
        list_filter: &["author"],
        ordering: &["title"],
    },
    ModelAdmin {
        name: "libraries",
        verbose_name_plural: "Libraries",
        list_display: &["name"],
        search_fields: &["name"],
        list_filter: &[],
        ordering: &["name"],
    },
    ModelAdmin {
        name: "librarians",
        verbose_name_plural: "Librarians",
        list_display: &["name", "library"],
        search_fields: &["name"],
        list_filter: &[],
        ordering: &["name"],
    },
    ModelAdmin {
        name: "userprofiles",
        verbose_name_plural: "User profiles",
        list_display: &["user", "role"],
        search_fields: &["user__username", "user__email"],
        list_filter: &["role"],
        ordering: &["user__username"],
    },
    ModelAdmin {
        name: "users",
        verbose_name_plural: "Users",
        list_display: &[
            "email",
            "username",
            "first_name",
            "last_name",
            "date_of_birth",
            "age_display",
            "is_active",
            "is_staff",
            "date_joined",
            "profile_photo_display",
        ],
        search_fields: &["email", "username", "first_name", "last_name"],
        list_filter: &["is_staff", "is_superuser", "is_active"],
        ordering: &["email"],
    },
];

/// The admin surface, built once from configuration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminSite {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
    pub media_url: String,
    pub models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn new(config: &AdminSiteConfig) -> Self {
        Self {
            site_header: config.site_header.clone(),
            site_title: config.site_title.clone(),
            index_title: config.index_title.clone(),
            media_url: config.media_url.clone(),
            models: REGISTERED.to_vec(),
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelAdmin> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// "N years old", or "Not specified" without a date of birth
pub fn age_display(age: Option<i32>) -> String {
    match age {
        Some(age) => format!("{} years old", age),
        None => "Not specified".to_string(),
    }
}

/// Thumbnail tag for the photo path, or "No photo"
pub fn profile_photo_display(photo: Option<&str>, media_url: &str) -> String {
    match photo {
        Some(path) if !path.is_empty() => format!(
            r#"<img src="{}{}" width="50" height="50" style="border-radius: 50%; object-fit: cover;" />"#,
            media_url,
            path.replace('"', "&quot;")
        ),
        _ => "No photo".to_string(),
    }
}

/// One row of the user changelist
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserAdminRow {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age_display: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub profile_photo_display: String,
}

impl UserAdminRow {
    pub fn new(user: &User, today: NaiveDate, media_url: &str) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_of_birth: user.date_of_birth,
            age_display: age_display(user.age_on(today)),
            is_active: user.is_active,
            is_staff: user.is_staff,
            date_joined: user.date_joined,
            profile_photo_display: profile_photo_display(user.profile_photo.as_deref(), media_url),
        }
    }
}

//! Users repository for database operations
//!
//! All writes go through a transaction that ends with the profile hook.

use sqlx::{Pool, Postgres};

use super::profiles::sync_for_user;
use crate::{
    error::{AppError, AppResult},
    models::{
        profile::{Role, UserProfile},
        user::{NewUser, UpdateUser, User, UserQuery},
    },
};

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, password, date_of_birth, \
     profile_photo, is_active, is_staff, is_superuser, date_joined, last_login";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by (normalized) email, the login identity
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::int IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// List users for the admin changelist, ordered by email
    pub async fn search(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {} FROM users
            WHERE ($1::text IS NULL
                   OR email ILIKE '%' || $1 || '%'
                   OR username ILIKE '%' || $1 || '%'
                   OR first_name ILIKE '%' || $1 || '%'
                   OR last_name ILIKE '%' || $1 || '%')
              AND ($2::bool IS NULL OR is_staff = $2)
              AND ($3::bool IS NULL OR is_superuser = $3)
              AND ($4::bool IS NULL OR is_active = $4)
            ORDER BY email
            "#,
            USER_COLUMNS
        ))
        .bind(query.q.as_deref())
        .bind(query.is_staff)
        .bind(query.is_superuser)
        .bind(query.is_active)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Insert a user; its default profile is created in the same transaction
    pub async fn create(&self, user: &NewUser) -> AppResult<(User, UserProfile)> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                email, username, first_name, last_name, password, date_of_birth,
                profile_photo, is_active, is_staff, is_superuser
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password)
        .bind(user.date_of_birth)
        .bind(&user.profile_photo)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .fetch_one(&mut *tx)
        .await?;

        let profile = sync_for_user(&mut tx, created.id, None).await?;
        tx.commit().await?;

        tracing::info!(user_id = created.id, "Created user {}", created.email);
        Ok((created, profile))
    }

    /// Update an existing user and re-save its profile.
    ///
    /// `update.role`, when set, is written to the profile; otherwise the
    /// profile is only created if missing. `password` is the already hashed
    /// value.
    pub async fn update(
        &self,
        id: i32,
        update: &UpdateUser,
        password: Option<String>,
    ) -> AppResult<(User, UserProfile)> {
        // $1 is the user id
        let mut sets: Vec<String> = Vec::new();
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(update.email, "email");
        add_field!(update.username, "username");
        add_field!(update.first_name, "first_name");
        add_field!(update.last_name, "last_name");
        add_field!(update.date_of_birth, "date_of_birth");
        add_field!(update.profile_photo, "profile_photo");
        add_field!(update.is_active, "is_active");
        add_field!(update.is_staff, "is_staff");
        add_field!(update.is_superuser, "is_superuser");
        add_field!(password, "password");

        if sets.is_empty() {
            // Nothing changed on the user itself; still a save for the hook
            sets.push("id = id".to_string());
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            USER_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, User>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(update.email);
        bind_field!(update.username);
        bind_field!(update.first_name);
        bind_field!(update.last_name);
        bind_field!(update.date_of_birth);
        bind_field!(update.profile_photo);
        bind_field!(update.is_active);
        bind_field!(update.is_staff);
        bind_field!(update.is_superuser);
        bind_field!(password);

        let mut tx = self.pool.begin().await?;

        let updated = builder
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        let profile = sync_for_user(&mut tx, id, update.role).await?;
        tx.commit().await?;

        Ok((updated, profile))
    }

    /// Change only the role carried by the user's profile
    pub async fn save_role(&self, id: i32, role: Role) -> AppResult<(User, UserProfile)> {
        let update = UpdateUser {
            role: Some(role),
            ..Default::default()
        };
        self.update(id, &update, None).await
    }

    /// Stamp a successful login
    pub async fn touch_last_login(&self, id: i32) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        sync_for_user(&mut tx, id, None).await?;
        tx.commit().await?;

        Ok(user)
    }

    /// Delete a user; the profile goes with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}

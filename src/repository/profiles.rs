//! User profiles and the post-save profile hook
//!
//! Every user write runs [`sync_for_user`] inside its own transaction, so a
//! committed user always has exactly one profile row. The hook is a single
//! upsert against the unique `user_profiles.user_id` constraint, which makes
//! concurrent saves of the same user safe.

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::profile::{Role, UserProfile, UserProfileQuery, UserProfileWithUser},
};

/// The one profile write performed after a user save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileWrite {
    /// Re-persist the caller's pending profile changes
    Save(Role),
    /// Create the default profile unless one already exists
    EnsureDefault,
}

impl ProfileWrite {
    pub fn for_save(pending_role: Option<Role>) -> Self {
        match pending_role {
            Some(role) => ProfileWrite::Save(role),
            None => ProfileWrite::EnsureDefault,
        }
    }
}

/// Post-save hook for users: create or re-save the user's profile
pub async fn sync_for_user(
    conn: &mut PgConnection,
    user_id: i32,
    pending_role: Option<Role>,
) -> AppResult<UserProfile> {
    let write = ProfileWrite::for_save(pending_role);
    tracing::debug!(user_id, ?write, "Syncing user profile");

    match write {
        ProfileWrite::Save(role) => {
            let profile = sqlx::query_as::<_, UserProfile>(
                r#"
                INSERT INTO user_profiles (user_id, role) VALUES ($1, $2)
                ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
                RETURNING id, user_id, role
                "#,
            )
            .bind(user_id)
            .bind(role)
            .fetch_one(&mut *conn)
            .await?;
            Ok(profile)
        }
        ProfileWrite::EnsureDefault => {
            sqlx::query(
                r#"
                INSERT INTO user_profiles (user_id, role) VALUES ($1, $2)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(Role::default())
            .execute(&mut *conn)
            .await?;

            let profile = sqlx::query_as::<_, UserProfile>(
                "SELECT id, user_id, role FROM user_profiles WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
            Ok(profile)
        }
    }
}

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Profile of a user, None when the row is missing
    pub async fn find_for_user(&self, user_id: i32) -> AppResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, role FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get_for_user(&self, user_id: i32) -> AppResult<UserProfile> {
        self.find_for_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", user_id)))
    }

    pub async fn count_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Profiles joined with their users
    pub async fn list_with_users(&self, query: &UserProfileQuery) -> AppResult<Vec<UserProfileWithUser>> {
        let profiles = sqlx::query_as::<_, UserProfileWithUser>(
            r#"
            SELECT p.id, p.user_id, p.role, u.username, u.email
            FROM user_profiles p
            JOIN users u ON u.id = p.user_id
            WHERE ($1::text IS NULL OR u.username ILIKE '%' || $1 || '%' OR u.email ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR p.role = $2)
            ORDER BY u.username, p.id
            "#,
        )
        .bind(query.q.as_deref())
        .bind(query.role)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_role_is_saved() {
        assert_eq!(
            ProfileWrite::for_save(Some(Role::Librarian)),
            ProfileWrite::Save(Role::Librarian)
        );
    }

    #[test]
    fn test_no_pending_role_ensures_default() {
        assert_eq!(ProfileWrite::for_save(None), ProfileWrite::EnsureDefault);
    }
}

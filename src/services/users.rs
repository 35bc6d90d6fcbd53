//! Account management: user manager, registration and authentication

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        profile::{CurrentUser, Role, UserProfile},
        user::{
            normalize_email, normalize_username, NewUser, RegisterUser, UpdateUser, User, UserClaims,
            UserFields, UserQuery,
        },
    },
    repository::Repository,
};

/// Build the row for a regular account.
///
/// Fails when the email is blank; the email domain is lowercased and the
/// username NFKC-normalized (defaulting to the email's local part).
pub fn prepare_user(email: &str, password_hash: Option<String>, fields: UserFields) -> AppResult<NewUser> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("The Email field must be set".to_string()));
    }

    let email = normalize_email(email);
    let username = match fields.username {
        Some(ref name) if !name.trim().is_empty() => normalize_username(name.trim()),
        _ => normalize_username(email.split('@').next().unwrap_or_default()),
    };

    Ok(NewUser {
        email,
        username,
        first_name: fields.first_name.unwrap_or_default(),
        last_name: fields.last_name.unwrap_or_default(),
        password: password_hash,
        date_of_birth: fields.date_of_birth,
        profile_photo: fields.profile_photo,
        is_active: fields.is_active.unwrap_or(true),
        is_staff: fields.is_staff.unwrap_or(false),
        is_superuser: fields.is_superuser.unwrap_or(false),
    })
}

/// Fill in superuser flags; explicit `false` for staff or superuser is rejected
pub fn superuser_fields(mut fields: UserFields) -> AppResult<UserFields> {
    let is_staff = *fields.is_staff.get_or_insert(true);
    let is_superuser = *fields.is_superuser.get_or_insert(true);
    fields.is_active.get_or_insert(true);

    if !is_staff {
        return Err(AppError::Validation("Superuser must have is_staff=True.".to_string()));
    }
    if !is_superuser {
        return Err(AppError::Validation("Superuser must have is_superuser=True.".to_string()));
    }
    Ok(fields)
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create a regular account; its profile is created with role Member
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        fields: UserFields,
    ) -> AppResult<(User, UserProfile)> {
        fields.validate()?;
        let hash = password.map(|p| self.hash_password(p)).transpose()?;
        let new_user = prepare_user(email, hash, fields)?;

        if self.repository.users.email_exists(&new_user.email, None).await? {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                new_user.email
            )));
        }

        self.repository.users.create(&new_user).await
    }

    /// Create a staff superuser
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        fields: UserFields,
    ) -> AppResult<(User, UserProfile)> {
        let fields = superuser_fields(fields)?;
        self.create_user(email, password, fields).await
    }

    /// Self-registration; the new account is logged in right away
    pub async fn register(&self, form: RegisterUser) -> AppResult<(String, User, UserProfile)> {
        form.validate()?;
        if form.password1 != form.password2 {
            return Err(AppError::Validation(
                "The two password fields didn't match.".to_string(),
            ));
        }

        let fields = UserFields {
            username: Some(form.username),
            first_name: form.first_name,
            last_name: form.last_name,
            date_of_birth: form.date_of_birth,
            ..Default::default()
        };
        let (user, profile) = self
            .create_user(&form.email, Some(&form.password1), fields)
            .await?;

        let user = self.repository.users.touch_last_login(user.id).await?;
        let token = self.create_token(&user)?;

        tracing::info!(user_id = user.id, "Registered {}", user.email);
        Ok((token, user, profile))
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is inactive".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let user = self.repository.users.touch_last_login(user.id).await?;
        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// The caller with its profile (None when the profile row is missing)
    pub async fn current_user(&self, user_id: i32) -> AppResult<CurrentUser> {
        let user = self.repository.users.get_by_id(user_id).await?;
        if !user.is_active {
            return Err(AppError::Authentication("Account is inactive".to_string()));
        }
        let profile = self.repository.profiles.find_for_user(user_id).await?;
        Ok(CurrentUser { user, profile })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository.users.search(query).await
    }

    /// Update an account; a role in the update is saved to the profile
    pub async fn update_user(&self, id: i32, mut update: UpdateUser) -> AppResult<(User, UserProfile)> {
        update.validate()?;

        if let Some(ref email) = update.email {
            let email = normalize_email(email);
            if self.repository.users.email_exists(&email, Some(id)).await? {
                return Err(AppError::Conflict(format!("A user with email {} already exists", email)));
            }
            update.email = Some(email);
        }
        if let Some(ref username) = update.username {
            update.username = Some(normalize_username(username.trim()));
        }

        let hash = update
            .password
            .take()
            .map(|p| self.hash_password(&p))
            .transpose()?;

        self.repository.users.update(id, &update, hash).await
    }

    pub async fn set_role(&self, id: i32, role: Role) -> AppResult<(User, UserProfile)> {
        self.repository.users.save_role(id, role).await
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_is_rejected() {
        let result = prepare_user("   ", None, UserFields::default());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_prepare_user_normalizes() {
        let fields = UserFields {
            username: Some(" \u{FB01}ona ".to_string()),
            ..Default::default()
        };
        let user = prepare_user("Fiona@Example.COM", None, fields).unwrap();
        assert_eq!(user.email, "Fiona@example.com");
        assert_eq!(user.username, "fiona");
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
        assert_eq!(user.password, None);
    }

    #[test]
    fn test_username_defaults_to_local_part() {
        let user = prepare_user("reader@example.org", None, UserFields::default()).unwrap();
        assert_eq!(user.username, "reader");
    }

    #[test]
    fn test_superuser_defaults() {
        let fields = superuser_fields(UserFields::default()).unwrap();
        assert_eq!(fields.is_staff, Some(true));
        assert_eq!(fields.is_superuser, Some(true));
        assert_eq!(fields.is_active, Some(true));
    }

    #[test]
    fn test_superuser_inconsistent_flags() {
        let not_staff = UserFields {
            is_staff: Some(false),
            ..Default::default()
        };
        assert!(matches!(superuser_fields(not_staff), Err(AppError::Validation(_))));

        let not_superuser = UserFields {
            is_superuser: Some(false),
            ..Default::default()
        };
        assert!(matches!(superuser_fields(not_superuser), Err(AppError::Validation(_))));
    }
}

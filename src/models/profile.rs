//! User profile, roles and the role predicates used by the dashboards

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::user::User;

/// Authorization level stored on a user's profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Librarian,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Librarian" => Ok(Role::Librarian),
            "Member" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// Stored as VARCHAR(20)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Profile row, exactly one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub user_id: i32,
    pub role: Role,
}

/// Profile joined with its owner, as shown on the admin dashboard and changelist
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfileWithUser {
    pub id: i32,
    pub user_id: i32,
    pub role: Role,
    pub username: String,
    pub email: String,
}

impl std::fmt::Display for UserProfileWithUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.username, self.role)
    }
}

/// Profile changelist query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserProfileQuery {
    /// Free text matched against username and email
    pub q: Option<String>,
    pub role: Option<Role>,
}

/// Change a user's role
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// The authenticated caller with its profile, if one exists
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUser {
    pub user: User,
    pub profile: Option<UserProfile>,
}

impl CurrentUser {
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }
}

/// True iff the user has a profile with role Admin
pub fn is_admin(user: &CurrentUser) -> bool {
    user.has_role(Role::Admin)
}

/// True iff the user has a profile with role Librarian
pub fn is_librarian(user: &CurrentUser) -> bool {
    user.has_role(Role::Librarian)
}

/// True iff the user has a profile with role Member
pub fn is_member(user: &CurrentUser) -> bool {
    user.has_role(Role::Member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn current(role: Option<Role>) -> CurrentUser {
        let user = User {
            id: 7,
            email: "reader@example.org".to_string(),
            username: "reader".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: None,
            date_of_birth: None,
            profile_photo: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        };
        CurrentUser {
            profile: role.map(|role| UserProfile { id: 1, user_id: user.id, role }),
            user,
        }
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Librarian".parse::<Role>(), Ok(Role::Librarian));
        assert!("librarian".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_predicates_are_mutually_exclusive() {
        for role in [Role::Admin, Role::Librarian, Role::Member] {
            let user = current(Some(role));
            let matches = [is_admin(&user), is_librarian(&user), is_member(&user)];
            assert_eq!(matches.iter().filter(|m| **m).count(), 1, "role {}", role);
        }
        assert!(is_admin(&current(Some(Role::Admin))));
        assert!(is_librarian(&current(Some(Role::Librarian))));
        assert!(is_member(&current(Some(Role::Member))));
    }

    #[test]
    fn test_missing_profile_has_no_role() {
        let user = current(None);
        assert!(!is_admin(&user));
        assert!(!is_librarian(&user));
        assert!(!is_member(&user));
        assert_eq!(user.role(), None);
    }

    #[test]
    fn test_profile_display() {
        let profile = UserProfileWithUser {
            id: 1,
            user_id: 2,
            role: Role::Librarian,
            username: "alice".to_string(),
            email: "alice@example.org".to_string(),
        };
        assert_eq!(profile.to_string(), "alice - Librarian");
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Role of a user, stored as an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Unspecified,
    User,
    Admin,
}

impl From<UserRole> for i32 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Unspecified => 0,
            UserRole::User => 1,
            UserRole::Admin => 2,
        }
    }
}

impl TryFrom<i32> for UserRole {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::User),
            2 => Ok(Self::Admin),
            other => Err(other),
        }
    }
}

/// One row of the `users` select. The password column is never read back.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "user_id")]
    pub id: i64,
    #[sqlx(rename = "user_name")]
    pub name: String,
    #[sqlx(rename = "user_email")]
    pub email: String,
    #[sqlx(rename = "user_role")]
    pub role: i32,
    #[sqlx(rename = "user_created_at")]
    pub created_at: OffsetDateTime,
    #[sqlx(rename = "user_updated_at")]
    pub updated_at: Option<OffsetDateTime>, // NULL until the first update
}

/// A user as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

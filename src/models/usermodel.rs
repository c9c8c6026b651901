use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Support,
    Moderator,
    Admin,
    SystemAdmin,
}

impl UserRole {
    pub fn to_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Support => "support",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
            UserRole::SystemAdmin => "system_admin",
        }
    }

    /// Position in the role hierarchy. Single source of truth for every
    /// permission check; do not duplicate these numbers elsewhere.
    pub fn level(&self) -> u8 {
        match self {
            UserRole::User => 1,
            UserRole::Support => 2,
            UserRole::Moderator => 3,
            UserRole::Admin => 4,
            UserRole::SystemAdmin => 5,
        }
    }

    /// Staff roles can see other users' tickets, bans and reviews.
    pub fn is_staff(&self) -> bool {
        self.level() >= UserRole::Support.level()
    }

    pub fn all() -> [UserRole; 5] {
        [
            UserRole::User,
            UserRole::Support,
            UserRole::Moderator,
            UserRole::Admin,
            UserRole::SystemAdmin,
        ]
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    // Resolved from user_roles; absent row means plain user.
    pub role: UserRole,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

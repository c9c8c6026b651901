use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserRole};

// The effective role lives in user_roles (one row per user); a missing row
// means plain user. Every user query resolves it in the same join.
const USER_COLUMNS: &str = r#"
    u.id, u.name, u.username, u.email, u.password,
    COALESCE(r.role, 'user'::user_role) AS role,
    u.created_at, u.updated_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error>;

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, Error>;

    async fn get_user_count(&self) -> Result<i64, Error>;

    async fn save_user(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error>;

    async fn get_user_role(&self, user_id: Uuid) -> Result<UserRole, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                r#"
                SELECT {USER_COLUMNS} FROM users u
                LEFT JOIN user_roles r ON r.user_id = u.id
                WHERE u.id = $1
                "#
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(&format!(
                r#"
                SELECT {USER_COLUMNS} FROM users u
                LEFT JOIN user_roles r ON r.user_id = u.id
                WHERE u.username = $1
                "#
            ))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                r#"
                SELECT {USER_COLUMNS} FROM users u
                LEFT JOIN user_roles r ON r.user_id = u.id
                WHERE u.email = $1
                "#
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users u
            LEFT JOIN user_roles r ON r.user_id = u.id
            ORDER BY u.created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_user_count(&self) -> Result<i64, Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn save_user(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, username, email, password,
                      'user'::user_role AS role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_role(&self, user_id: Uuid) -> Result<UserRole, Error> {
        let role: (UserRole,) = sqlx::query_as(
            r#"
            SELECT COALESCE(r.role, 'user'::user_role)
            FROM users u
            LEFT JOIN user_roles r ON r.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(role.0)
    }
}

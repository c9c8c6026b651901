use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::banmodel::UserBan;

#[async_trait]
pub trait BanExt {
    async fn get_ban(&self, ban_id: Uuid) -> Result<Option<UserBan>, Error>;

    async fn get_bans(
        &self,
        limit: i64,
        offset: i64,
        user_id: Option<Uuid>,
    ) -> Result<Vec<UserBan>, Error>;

    /// Bans that currently restrict the user: flag set AND not yet expired.
    async fn get_effective_bans(&self, user_id: Uuid) -> Result<Vec<UserBan>, Error>;
}

#[async_trait]
impl BanExt for DBClient {
    async fn get_ban(&self, ban_id: Uuid) -> Result<Option<UserBan>, Error> {
        let ban = sqlx::query_as::<_, UserBan>(
            r#"
            SELECT * FROM user_bans
            WHERE id = $1
            "#,
        )
        .bind(ban_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ban)
    }

    async fn get_bans(
        &self,
        limit: i64,
        offset: i64,
        user_id: Option<Uuid>,
    ) -> Result<Vec<UserBan>, Error> {
        let bans = sqlx::query_as::<_, UserBan>(
            r#"
            SELECT * FROM user_bans
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bans)
    }

    async fn get_effective_bans(&self, user_id: Uuid) -> Result<Vec<UserBan>, Error> {
        let bans = sqlx::query_as::<_, UserBan>(
            r#"
            SELECT * FROM user_bans
            WHERE user_id = $1
              AND is_active = TRUE
              AND expires_at > NOW()
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bans)
    }
}

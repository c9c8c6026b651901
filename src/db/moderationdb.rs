use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::moderationmodel::{ContentType, ModerationRule};

#[async_trait]
pub trait ModerationExt {
    async fn get_moderation_rule(&self, rule_id: Uuid) -> Result<Option<ModerationRule>, Error>;

    async fn get_moderation_rules(&self) -> Result<Vec<ModerationRule>, Error>;

    /// Active rules that apply to a given content type.
    async fn get_active_rules_for(
        &self,
        content_type: ContentType,
    ) -> Result<Vec<ModerationRule>, Error>;
}

#[async_trait]
impl ModerationExt for DBClient {
    async fn get_moderation_rule(&self, rule_id: Uuid) -> Result<Option<ModerationRule>, Error> {
        let rule = sqlx::query_as::<_, ModerationRule>(
            r#"
            SELECT * FROM moderation_rules
            WHERE id = $1
            "#,
        )
        .bind(rule_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    async fn get_moderation_rules(&self) -> Result<Vec<ModerationRule>, Error> {
        let rules = sqlx::query_as::<_, ModerationRule>(
            r#"
            SELECT * FROM moderation_rules
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    async fn get_active_rules_for(
        &self,
        content_type: ContentType,
    ) -> Result<Vec<ModerationRule>, Error> {
        let rules = sqlx::query_as::<_, ModerationRule>(
            r#"
            SELECT * FROM moderation_rules
            WHERE is_active = TRUE
              AND $1 = ANY(content_types)
            ORDER BY created_at ASC
            "#,
        )
        .bind(content_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }
}

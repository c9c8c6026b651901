use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::settingsmodel::SystemSetting;

#[async_trait]
pub trait SettingsExt {
    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>, Error>;

    async fn get_settings(&self) -> Result<Vec<SystemSetting>, Error>;

    async fn upsert_setting(
        &self,
        key: &str,
        value: serde_json::Value,
        description: Option<&str>,
        updated_by: Uuid,
    ) -> Result<SystemSetting, Error>;
}

#[async_trait]
impl SettingsExt for DBClient {
    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>, Error> {
        let setting = sqlx::query_as::<_, SystemSetting>(
            r#"
            SELECT * FROM system_settings
            WHERE setting_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    async fn get_settings(&self) -> Result<Vec<SystemSetting>, Error> {
        let settings = sqlx::query_as::<_, SystemSetting>(
            r#"
            SELECT * FROM system_settings
            ORDER BY setting_key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn upsert_setting(
        &self,
        key: &str,
        value: serde_json::Value,
        description: Option<&str>,
        updated_by: Uuid,
    ) -> Result<SystemSetting, Error> {
        let setting = sqlx::query_as::<_, SystemSetting>(
            r#"
            INSERT INTO system_settings (setting_key, setting_value, description, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (setting_key) DO UPDATE
            SET setting_value = EXCLUDED.setting_value,
                description = COALESCE(EXCLUDED.description, system_settings.description),
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}

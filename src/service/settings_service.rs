use std::sync::Arc;

use crate::{
    db::{db::DBClient, settingsdb::SettingsExt},
    models::{
        settingsmodel::{SettingValue, SystemSetting},
        usermodel::User,
    },
    service::{audit_service::AuditService, error::ServiceError},
};

#[derive(Debug, Clone)]
pub struct SettingsService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl SettingsService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self { db_client, audit_service }
    }

    pub async fn get(&self, key: &str) -> Result<SystemSetting, ServiceError> {
        self.db_client
            .get_setting(key)
            .await?
            .ok_or_else(|| ServiceError::SettingNotFound(key.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<SystemSetting>, ServiceError> {
        Ok(self.db_client.get_settings().await?)
    }

    /// Writes go through the tagged union: a payload that does not parse or
    /// violates its own declared bounds never reaches the table.
    pub async fn set(
        &self,
        acting_user: &User,
        key: &str,
        value: SettingValue,
        description: Option<&str>,
    ) -> Result<SystemSetting, ServiceError> {
        value
            .validate()
            .map_err(ServiceError::InvalidSetting)?;

        let value_json = serde_json::to_value(&value)
            .map_err(|e| ServiceError::InvalidSetting(e.to_string()))?;

        let setting = self
            .db_client
            .upsert_setting(key, value_json, description, acting_user.id)
            .await?;

        self.audit_service
            .log_event(
                acting_user.id,
                "setting_updated",
                None,
                None,
                Some(serde_json::json!({ "key": key })),
                format!("System setting '{}' updated", key),
            )
            .await?;

        Ok(setting)
    }
}

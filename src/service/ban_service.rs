use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{db::DBClient, bandb::BanExt},
    models::{
        banmodel::{BanType, UserBan},
        usermodel::User,
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct BanService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    audit_service: Arc<AuditService>,
}

impl BanService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self { db_client, notification_service, audit_service }
    }

    pub async fn ban(
        &self,
        target_user: Uuid,
        acting_user: &User,
        ban_type: BanType,
        reason: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UserBan, ServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::ReasonRequired);
        }
        if expires_at <= Utc::now() {
            return Err(ServiceError::Validation(
                "Ban expiry must be in the future".to_string(),
            ));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let ban: UserBan = sqlx::query_as::<_, UserBan>(
            r#"
            INSERT INTO user_bans (user_id, ban_type, reason, is_active, expires_at, created_by)
            VALUES ($1, $2, $3, TRUE, $4, $5)
            RETURNING *
            "#,
        )
        .bind(target_user)
        .bind(ban_type)
        .bind(reason)
        .bind(expires_at)
        .bind(acting_user.id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "user_banned",
                Some(ban.id),
                Some(target_user),
                Some(serde_json::json!({
                    "ban_type": ban_type.to_str(),
                    "reason": reason,
                    "expires_at": expires_at,
                })),
                "User banned".to_string(),
            )
            .await?;

        self.notification_service
            .store_notification_tx(
                &mut tx,
                target_user,
                "banned",
                Some(serde_json::json!({ "ban_id": ban.id, "ban_type": ban_type.to_str() })),
                format!("A restriction has been applied to your account: {}", reason),
            )
            .await?;

        tx.commit().await?;

        Ok(ban)
    }

    /// Lift a ban before its natural expiry. Clears only the flag — the
    /// expiry timestamp stays as issued, the effective-ban predicate already
    /// short-circuits on the flag.
    pub async fn unban(
        &self,
        ban_id: Uuid,
        acting_user: &User,
        reason: &str,
    ) -> Result<UserBan, ServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::ReasonRequired);
        }

        let ban = self
            .db_client
            .get_ban(ban_id)
            .await?
            .ok_or(ServiceError::BanNotFound(ban_id))?;

        if !ban.is_active {
            return Err(ServiceError::BanNotActive(ban_id));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let updated: UserBan = sqlx::query_as::<_, UserBan>(
            r#"
            UPDATE user_bans
            SET is_active = FALSE,
                unban_reason = $1,
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(reason)
        .bind(ban_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "user_unbanned",
                Some(ban_id),
                Some(ban.user_id),
                Some(serde_json::json!({ "reason": reason })),
                "User unbanned".to_string(),
            )
            .await?;

        self.notification_service
            .store_notification_tx(
                &mut tx,
                ban.user_id,
                "unbanned",
                Some(serde_json::json!({ "ban_id": ban_id })),
                format!("Your restriction has been lifted: {}", reason),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Re-checks the predicate in code even though the query already filters;
    /// the stored flag alone is never trusted.
    pub async fn effective_bans(&self, user_id: Uuid) -> Result<Vec<UserBan>, ServiceError> {
        let now = Utc::now();
        let bans = self
            .db_client
            .get_effective_bans(user_id)
            .await?
            .into_iter()
            .filter(|ban| ban.is_effective(now))
            .collect();

        Ok(bans)
    }
}

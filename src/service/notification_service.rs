use std::sync::Arc;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::notificationmodel::Notification,
    service::error::ServiceError,
};

/// Notifications are stored rows; delivery (mail, push) is someone else's
/// problem.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn store_notification(
        &self,
        user_id: Uuid,
        kind: &str,
        metadata: Option<serde_json::Value>,
        body: String,
    ) -> Result<(), ServiceError> {
        tracing::debug!("notification [{}] for {}: {}", kind, user_id, body);

        sqlx::query(NOTIFICATION_INSERT)
            .bind(user_id)
            .bind(kind)
            .bind(body)
            .bind(metadata)
            .execute(&self.db_client.pool)
            .await?;

        Ok(())
    }

    /// Transactional variant: the notification commits together with the
    /// state change it announces.
    pub async fn store_notification_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        kind: &str,
        metadata: Option<serde_json::Value>,
        body: String,
    ) -> Result<(), ServiceError> {
        tracing::debug!("notification [{}] for {}: {}", kind, user_id, body);

        sqlx::query(NOTIFICATION_INSERT)
            .bind(user_id)
            .bind(kind)
            .bind(body)
            .bind(metadata)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, ServiceError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
              AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db_client.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db_client.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::Validation("Notification not found".to_string()));
        }

        Ok(())
    }
}

const NOTIFICATION_INSERT: &str = r#"
    INSERT INTO notifications (user_id, kind, body, metadata, is_read, created_at)
    VALUES ($1, $2, $3, $4, FALSE, NOW())
"#;

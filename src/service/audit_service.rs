use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{db::db::DBClient, service::error::ServiceError};

/// Severity of a security log entry.
#[derive(Debug, Clone, Copy, Serialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "log_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: String,
    pub entity_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SecurityLog {
    pub id: Uuid,
    pub event_type: String,
    pub user_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub severity: LogSeverity,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuditService {
    db_client: Arc<DBClient>,
}

impl AuditService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn log_event(
        &self,
        user_id: Uuid,
        event_type: &str,
        entity_id: Option<Uuid>,
        related_user_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        description: String,
    ) -> Result<(), ServiceError> {
        sqlx::query(AUDIT_INSERT)
            .bind(user_id)
            .bind(event_type)
            .bind(entity_id)
            .bind(related_user_id)
            .bind(metadata)
            .bind(description)
            .execute(&self.db_client.pool)
            .await?;

        Ok(())
    }

    /// Same as [`log_event`](Self::log_event) but joins an open transaction,
    /// so the audit entry commits or rolls back with the mutation it records.
    pub async fn log_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        event_type: &str,
        entity_id: Option<Uuid>,
        related_user_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        description: String,
    ) -> Result<(), ServiceError> {
        sqlx::query(AUDIT_INSERT)
            .bind(user_id)
            .bind(event_type)
            .bind(entity_id)
            .bind(related_user_id)
            .bind(metadata)
            .bind(description)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn log_security_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_type: &str,
        user_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        severity: LogSeverity,
    ) -> Result<(), ServiceError> {
        sqlx::query(SECURITY_INSERT)
            .bind(event_type)
            .bind(user_id)
            .bind(details)
            .bind(severity)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn log_security_event(
        &self,
        event_type: &str,
        user_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        severity: LogSeverity,
    ) -> Result<(), ServiceError> {
        sqlx::query(SECURITY_INSERT)
            .bind(event_type)
            .bind(user_id)
            .bind(details)
            .bind(severity)
            .execute(&self.db_client.pool)
            .await?;

        Ok(())
    }

    pub async fn get_audit_logs(
        &self,
        limit: i64,
        offset: i64,
        user_id: Option<Uuid>,
    ) -> Result<Vec<AuditLog>, ServiceError> {
        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::uuid IS NULL OR user_id = $1 OR related_user_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db_client.pool)
        .await?;

        Ok(logs)
    }

    pub async fn get_security_logs(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SecurityLog>, ServiceError> {
        let logs = sqlx::query_as::<_, SecurityLog>(
            r#"
            SELECT * FROM security_logs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db_client.pool)
        .await?;

        Ok(logs)
    }
}

const AUDIT_INSERT: &str = r#"
    INSERT INTO audit_logs
        (user_id, event_type, entity_id, related_user_id, metadata, description, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW())
"#;

const SECURITY_INSERT: &str = r#"
    INSERT INTO security_logs (event_type, user_id, details, severity, created_at)
    VALUES ($1, $2, $3, $4, NOW())
"#;

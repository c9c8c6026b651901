use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, userdb::UserExt},
    lifecycle::permissions::can_assign_role,
    models::usermodel::{User, UserRole},
    service::{
        audit_service::{AuditService, LogSeverity},
        error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct RoleService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    audit_service: Arc<AuditService>,
}

impl RoleService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self { db_client, notification_service, audit_service }
    }

    /// Assign a role to a user. The old role row is replaced and the audit
    /// entry, security entry and notification commit with it in one
    /// transaction.
    ///
    /// A system_admin can never change their own role; nothing guarantees
    /// another system_admin exists to restore it.
    pub async fn change_role(
        &self,
        acting_user: &User,
        target_user_id: Uuid,
        new_role: UserRole,
    ) -> Result<User, ServiceError> {
        if acting_user.id == target_user_id && acting_user.role == UserRole::SystemAdmin {
            return Err(ServiceError::SelfRoleChange);
        }

        if !can_assign_role(acting_user.role, new_role) {
            return Err(ServiceError::Forbidden(format!(
                "{} cannot assign role {}",
                acting_user.role.to_str(),
                new_role.to_str()
            )));
        }

        let target = self
            .db_client
            .get_user(Some(target_user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(target_user_id))?;

        let mut tx = self.db_client.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(target_user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role, assigned_by, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(target_user_id)
        .bind(new_role)
        .bind(acting_user.id)
        .execute(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "role_changed",
                None,
                Some(target_user_id),
                Some(serde_json::json!({
                    "old_role": target.role.to_str(),
                    "new_role": new_role.to_str(),
                })),
                format!(
                    "Role of {} changed from {} to {}",
                    target.username,
                    target.role.to_str(),
                    new_role.to_str()
                ),
            )
            .await?;

        self.audit_service
            .log_security_event_tx(
                &mut tx,
                "role_change",
                Some(target_user_id),
                Some(serde_json::json!({
                    "changed_by": acting_user.id,
                    "old_role": target.role.to_str(),
                    "new_role": new_role.to_str(),
                })),
                LogSeverity::Warning,
            )
            .await?;

        self.notification_service
            .store_notification_tx(
                &mut tx,
                target_user_id,
                "role_changed",
                Some(serde_json::json!({ "role": new_role.to_str() })),
                format!("Your role has been changed to {}", new_role.to_str()),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "role of {} changed to {} by {}",
            target_user_id,
            new_role.to_str(),
            acting_user.id
        );

        Ok(User { role: new_role, ..target })
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    // Lazy pool never connects; guards that fire before the first query can
    // run without a database.
    fn service() -> RoleService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let notification_service =
            Arc::new(NotificationService::new(db_client.clone()));
        let audit_service = Arc::new(AuditService::new(db_client.clone()));
        RoleService::new(db_client, notification_service, audit_service)
    }

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Root".to_string(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: String::new(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn system_admin_cannot_demote_themselves() {
        let service = service();
        let admin = user_with_role(UserRole::SystemAdmin);
        let err = service
            .change_role(&admin, admin.id, UserRole::User)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::SelfRoleChange));
    }

    #[tokio::test]
    async fn assignment_above_own_level_is_forbidden() {
        let service = service();
        let admin = user_with_role(UserRole::Admin);
        let err = service
            .change_role(&admin, Uuid::new_v4(), UserRole::SystemAdmin)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}

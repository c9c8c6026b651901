use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, orderdb::OrderExt},
    lifecycle::transitions::{available_order_transitions, order_transition, OrderActor, OrderTransition},
    models::{
        ordermodel::{Order, OrderPriority, OrderStatus},
        usermodel::User,
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct OrderService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    audit_service: Arc<AuditService>,
}

/// Which side of the order a user is on, or None for outsiders.
pub fn resolve_actor(order: &Order, user_id: Uuid) -> Option<OrderActor> {
    if order.client_id == user_id {
        Some(OrderActor::Client)
    } else if order.executor_id == Some(user_id) {
        Some(OrderActor::Executor)
    } else {
        None
    }
}

impl OrderService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self { db_client, notification_service, audit_service }
    }

    /// Transitions the caller may invoke on this order right now.
    pub fn transitions_for(&self, order: &Order, user_id: Uuid) -> &'static [OrderTransition] {
        match resolve_actor(order, user_id) {
            Some(actor) => available_order_transitions(order.status, actor),
            None => &[],
        }
    }

    /// Applies a status transition requested by a participant. The
    /// transition table decides what is permitted; the status update, reason
    /// columns, audit entry and counterparty notification commit atomically.
    pub async fn transition(
        &self,
        order_id: Uuid,
        acting_user: &User,
        next: OrderStatus,
        reason: Option<String>,
    ) -> Result<Order, ServiceError> {
        let order = self
            .db_client
            .get_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        let actor = resolve_actor(&order, acting_user.id)
            .ok_or(ServiceError::NotParticipant(acting_user.id, order_id))?;

        let transition = order_transition(order.status, actor, next).ok_or_else(|| {
            ServiceError::InvalidTransition {
                from: order.status.to_str().to_string(),
                to: next.to_str().to_string(),
            }
        })?;

        let reason = reason.filter(|r| !r.trim().is_empty());
        if transition.requires_reason && reason.is_none() {
            return Err(ServiceError::ReasonRequired);
        }

        let mut tx = self.db_client.pool.begin().await?;

        let updated: Order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $1,
                cancellation_reason = CASE WHEN $1 = 'cancelled'::order_status
                                           THEN $2 ELSE cancellation_reason END,
                revision_reason = CASE WHEN $1 = 'revision'::order_status
                                       THEN $2 ELSE revision_reason END,
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(reason.as_deref())
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "order_transition",
                Some(order_id),
                counterparty(&order, actor),
                Some(serde_json::json!({
                    "from": order.status.to_str(),
                    "to": next.to_str(),
                    "reason": reason,
                })),
                format!("Order moved from {} to {}", order.status.label(), next.label()),
            )
            .await?;

        if let Some(other) = counterparty(&order, actor) {
            let body = match &reason {
                Some(reason) => format!(
                    "Order \"{}\" is now {}: {}",
                    order.title,
                    next.label(),
                    reason
                ),
                None => format!("Order \"{}\" is now {}", order.title, next.label()),
            };
            self.notification_service
                .store_notification_tx(
                    &mut tx,
                    other,
                    "order_status",
                    Some(serde_json::json!({ "order_id": order_id, "status": next.to_str() })),
                    body,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "order {} transitioned {} -> {} by {}",
            order_id,
            order.status.to_str(),
            next.to_str(),
            acting_user.id
        );

        Ok(updated)
    }

    /// Admin action: push the order expiry forward by the configured window.
    pub async fn extend_expiration(
        &self,
        order_id: Uuid,
        acting_user: &User,
        extension_hours: i64,
    ) -> Result<Order, ServiceError> {
        let order = self
            .db_client
            .get_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        let mut tx = self.db_client.pool.begin().await?;

        let updated: Order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET expires_at = GREATEST(COALESCE(expires_at, NOW()), NOW()) + $1 * INTERVAL '1 hour',
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(extension_hours)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "order_expiration_extended",
                Some(order_id),
                Some(order.client_id),
                Some(serde_json::json!({ "hours": extension_hours })),
                format!("Order expiration extended by {} hours", extension_hours),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Admin action: set or clear the priority override.
    pub async fn set_priority_override(
        &self,
        order_id: Uuid,
        acting_user: &User,
        priority: Option<OrderPriority>,
    ) -> Result<Order, ServiceError> {
        let order = self
            .db_client
            .get_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        let mut tx = self.db_client.pool.begin().await?;

        let updated: Order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET admin_priority_override = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(priority)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "order_priority_override",
                Some(order_id),
                Some(order.client_id),
                Some(serde_json::json!({
                    "override": priority.map(|p| p.to_str().to_string()),
                })),
                "Order priority override changed".to_string(),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

fn counterparty(order: &Order, actor: OrderActor) -> Option<Uuid> {
    match actor {
        OrderActor::Client => order.executor_id,
        OrderActor::Executor => Some(order.client_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(client: Uuid, executor: Option<Uuid>) -> Order {
        Order {
            id: Uuid::new_v4(),
            title: "Logo design".to_string(),
            description: "A logo".to_string(),
            price: 5000,
            client_id: client,
            executor_id: executor,
            status: OrderStatus::Pending,
            priority: OrderPriority::Normal,
            admin_priority_override: None,
            cancellation_reason: None,
            revision_reason: None,
            expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_both_sides() {
        let client = Uuid::new_v4();
        let executor = Uuid::new_v4();
        let o = order(client, Some(executor));

        assert_eq!(resolve_actor(&o, client), Some(OrderActor::Client));
        assert_eq!(resolve_actor(&o, executor), Some(OrderActor::Executor));
        assert_eq!(resolve_actor(&o, Uuid::new_v4()), None);
    }

    #[test]
    fn unassigned_order_has_no_executor_side() {
        let o = order(Uuid::new_v4(), None);
        assert_eq!(resolve_actor(&o, Uuid::new_v4()), None);
    }

    #[test]
    fn counterparty_is_the_other_side() {
        let client = Uuid::new_v4();
        let executor = Uuid::new_v4();
        let o = order(client, Some(executor));

        assert_eq!(counterparty(&o, OrderActor::Client), Some(executor));
        assert_eq!(counterparty(&o, OrderActor::Executor), Some(client));

        let unassigned = order(client, None);
        assert_eq!(counterparty(&unassigned, OrderActor::Client), None);
    }

    #[test]
    fn override_wins_over_priority() {
        let mut o = order(Uuid::new_v4(), None);
        assert_eq!(o.effective_priority(), OrderPriority::Normal);
        o.admin_priority_override = Some(OrderPriority::Urgent);
        assert_eq!(o.effective_priority(), OrderPriority::Urgent);
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, supportdb::SupportExt},
    lifecycle::transitions::ticket_transition_allowed,
    models::{
        supportmodel::{SupportTicket, TicketStatus},
        usermodel::User,
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct TicketService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    audit_service: Arc<AuditService>,
}

impl TicketService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self { db_client, notification_service, audit_service }
    }

    /// Move a ticket through its lifecycle. Entering resolved stamps
    /// `resolved_at`; the creator is notified on every transition, with the
    /// admin note appended when present.
    pub async fn transition(
        &self,
        ticket_id: Uuid,
        acting_user: &User,
        next: TicketStatus,
        note: Option<String>,
    ) -> Result<SupportTicket, ServiceError> {
        let ticket = self
            .db_client
            .get_support_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        if !ticket_transition_allowed(ticket.status, next) {
            return Err(ServiceError::InvalidTransition {
                from: ticket.status.to_str().to_string(),
                to: next.to_str().to_string(),
            });
        }

        let note = note.filter(|n| !n.trim().is_empty());

        let mut tx = self.db_client.pool.begin().await?;

        let updated: SupportTicket = sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets
            SET status = $1,
                resolved_at = CASE WHEN $1 = 'resolved'::ticket_status
                                   THEN NOW() ELSE resolved_at END,
                updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(ticket_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "ticket_transition",
                Some(ticket_id),
                Some(ticket.user_id),
                Some(serde_json::json!({
                    "from": ticket.status.to_str(),
                    "to": next.to_str(),
                    "note": note,
                })),
                format!("Ticket moved from {} to {}", ticket.status.label(), next.label()),
            )
            .await?;

        let body = match &note {
            Some(note) => format!(
                "Your ticket \"{}\" is now {}. Note: {}",
                ticket.subject,
                next.label(),
                note
            ),
            None => format!("Your ticket \"{}\" is now {}", ticket.subject, next.label()),
        };

        self.notification_service
            .store_notification_tx(
                &mut tx,
                ticket.user_id,
                "ticket_status",
                Some(serde_json::json!({ "ticket_id": ticket_id, "status": next.to_str() })),
                body,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn assign(
        &self,
        ticket_id: Uuid,
        acting_user: &User,
        assignee: Uuid,
    ) -> Result<SupportTicket, ServiceError> {
        let ticket = self
            .db_client
            .get_support_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        let mut tx = self.db_client.pool.begin().await?;

        let updated: SupportTicket = sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets
            SET assigned_to = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(assignee)
        .bind(ticket.id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "ticket_assigned",
                Some(ticket_id),
                Some(assignee),
                None,
                "Ticket assigned".to_string(),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::supportmodel::*;

#[async_trait]
pub trait SupportExt {
    async fn create_support_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        description: &str,
        priority: TicketPriority,
        urgency: TicketUrgency,
    ) -> Result<SupportTicket, Error>;

    async fn get_support_ticket(&self, ticket_id: Uuid) -> Result<Option<SupportTicket>, Error>;

    async fn get_support_tickets(
        &self,
        limit: i64,
        offset: i64,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicketWithUser>, Error>;

    async fn get_user_support_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>, Error>;
}

#[async_trait]
impl SupportExt for DBClient {
    async fn create_support_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        description: &str,
        priority: TicketPriority,
        urgency: TicketUrgency,
    ) -> Result<SupportTicket, Error> {
        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (user_id, subject, description, priority, urgency, status)
            VALUES ($1, $2, $3, $4, $5, 'open')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(subject)
        .bind(description)
        .bind(priority)
        .bind(urgency)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_support_ticket(&self, ticket_id: Uuid) -> Result<Option<SupportTicket>, Error> {
        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            SELECT * FROM support_tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_support_tickets(
        &self,
        limit: i64,
        offset: i64,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicketWithUser>, Error> {
        let tickets = sqlx::query_as::<_, SupportTicketWithUser>(
            r#"
            SELECT
                st.*,
                u.name AS user_name,
                u.email AS user_email
            FROM support_tickets st
            JOIN users u ON st.user_id = u.id
            WHERE ($1::ticket_status IS NULL OR st.status = $1)
            ORDER BY st.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn get_user_support_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>, Error> {
        let tickets = sqlx::query_as::<_, SupportTicket>(
            r#"
            SELECT * FROM support_tickets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, reviewdb::ReviewExt},
    lifecycle::transitions::review_transition_allowed,
    models::{
        reviewmodel::{ModerationStatus, Review},
        usermodel::User,
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
    audit_service: Arc<AuditService>,
}

impl ReviewService {
    pub fn new(
        db_client: Arc<DBClient>,
        notification_service: Arc<NotificationService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self { db_client, notification_service, audit_service }
    }

    /// Approve a pending review, optionally attaching signed bonus points.
    pub async fn approve(
        &self,
        review_id: Uuid,
        moderator: &User,
        bonus_points: i32,
    ) -> Result<Review, ServiceError> {
        let review = self.pending_review(review_id).await?;

        let mut tx = self.db_client.pool.begin().await?;

        let updated: Review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET moderation_status = 'approved',
                admin_bonus_points = $1,
                moderated_by = $2,
                moderated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(bonus_points)
        .bind(moderator.id)
        .bind(review_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                moderator.id,
                "review_approved",
                Some(review_id),
                Some(review.author_id),
                Some(serde_json::json!({ "bonus_points": bonus_points })),
                "Review approved".to_string(),
            )
            .await?;

        let body = if bonus_points != 0 {
            format!(
                "Your review has been approved. Bonus points: {:+}",
                bonus_points
            )
        } else {
            "Your review has been approved".to_string()
        };

        self.notification_service
            .store_notification_tx(
                &mut tx,
                review.author_id,
                "review_approved",
                Some(serde_json::json!({ "review_id": review_id })),
                body,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Reject a pending review. The reason is mandatory and is forwarded to
    /// the author verbatim.
    pub async fn reject(
        &self,
        review_id: Uuid,
        moderator: &User,
        reason: &str,
    ) -> Result<Review, ServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::ReasonRequired);
        }

        let review = self.pending_review(review_id).await?;

        let mut tx = self.db_client.pool.begin().await?;

        let updated: Review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET moderation_status = 'rejected',
                rejection_reason = $1,
                moderated_by = $2,
                moderated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(reason)
        .bind(moderator.id)
        .bind(review_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                moderator.id,
                "review_rejected",
                Some(review_id),
                Some(review.author_id),
                Some(serde_json::json!({ "reason": reason })),
                "Review rejected".to_string(),
            )
            .await?;

        self.notification_service
            .store_notification_tx(
                &mut tx,
                review.author_id,
                "review_rejected",
                Some(serde_json::json!({ "review_id": review_id })),
                format!("Your review has been rejected: {}", reason),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn pending_review(&self, review_id: Uuid) -> Result<Review, ServiceError> {
        let review = self
            .db_client
            .get_review(review_id)
            .await?
            .ok_or(ServiceError::ReviewNotFound(review_id))?;

        if !review_transition_allowed(review.moderation_status, ModerationStatus::Approved) {
            return Err(ServiceError::AlreadyModerated(review_id));
        }

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::models::usermodel::UserRole;

    // Lazy pool never connects; guards that fire before the first query can
    // run without a database.
    fn service() -> ReviewService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let notification_service =
            Arc::new(NotificationService::new(db_client.clone()));
        let audit_service = Arc::new(AuditService::new(db_client.clone()));
        ReviewService::new(db_client, notification_service, audit_service)
    }

    fn moderator() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Mod".to_string(),
            username: "mod".to_string(),
            email: "mod@example.com".to_string(),
            password: String::new(),
            role: UserRole::Moderator,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn reject_with_blank_reason_is_refused_before_any_lookup() {
        let service = service();
        let err = service
            .reject(Uuid::new_v4(), &moderator(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ReasonRequired));
    }
}

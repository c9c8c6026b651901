use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "moderation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    // Approved and rejected are both terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub order_id: Uuid,
    pub author_id: Uuid,
    pub target_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub moderation_status: ModerationStatus,
    pub admin_bonus_points: i32,
    pub rejection_reason: Option<String>,
    pub moderated_by: Option<Uuid>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    #[sqlx(flatten)]
    pub review: Review,
    pub author_name: String,
    pub author_username: String,
}

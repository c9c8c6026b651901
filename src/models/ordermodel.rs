use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InProgress,
    Review,
    Revision,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn to_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Review => "review",
            OrderStatus::Revision => "revision",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Display label shown in notifications and list views.
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::InProgress => "In progress",
            OrderStatus::Review => "Under review",
            OrderStatus::Revision => "Revision requested",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "order_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl OrderPriority {
    pub fn to_str(&self) -> &str {
        match self {
            OrderPriority::Low => "low",
            OrderPriority::Normal => "normal",
            OrderPriority::High => "high",
            OrderPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub client_id: Uuid,
    pub executor_id: Option<Uuid>,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub admin_priority_override: Option<OrderPriority>,
    pub cancellation_reason: Option<String>,
    pub revision_reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// An override set by an admin wins over the client-chosen priority.
    pub fn effective_priority(&self) -> OrderPriority {
        self.admin_priority_override.unwrap_or(self.priority)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderWithParties {
    #[sqlx(flatten)]
    pub order: Order,
    pub client_name: String,
    pub executor_name: Option<String>,
}

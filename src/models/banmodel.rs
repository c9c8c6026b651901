use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "ban_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BanType {
    OrderMute,
    PaymentMute,
    AccountBlock,
}

impl BanType {
    pub fn to_str(&self) -> &str {
        match self {
            BanType::OrderMute => "order_mute",
            BanType::PaymentMute => "payment_mute",
            BanType::AccountBlock => "account_block",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserBan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ban_type: BanType,
    pub reason: String,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub unban_reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserBan {
    /// A ban restricts the user only while the stored flag is set AND the
    /// expiry is still in the future. Checking `is_active` alone is wrong:
    /// expired bans keep the flag until someone touches the row.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ban(is_active: bool, expires_in: Duration) -> UserBan {
        let now = Utc::now();
        UserBan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            ban_type: BanType::OrderMute,
            reason: "spam".to_string(),
            is_active,
            expires_at: now + expires_in,
            unban_reason: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn effective_requires_both_conditions() {
        let now = Utc::now();
        assert!(ban(true, Duration::hours(1)).is_effective(now));
        assert!(!ban(false, Duration::hours(1)).is_effective(now));
        assert!(!ban(true, Duration::seconds(-1)).is_effective(now));
        assert!(!ban(false, Duration::seconds(-1)).is_effective(now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let b = ban(true, Duration::zero());
        assert!(!b.is_effective(b.expires_at));
    }
}

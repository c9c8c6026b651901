use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "rule_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Keyword,
    Pattern,
    Length,
    Spam,
    Profanity,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "content_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Ads,
    Reviews,
    Messages,
    Orders,
}

/// Ordered by severity: when several rules match the same content the
/// highest action wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(type_name = "rule_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    AutoApprove,
    Flag,
    RequireReview,
    Reject,
}

/// Criteria payload; the variant must agree with the rule's `rule_type`.
/// Stored as jsonb and validated when the rule is created or updated,
/// never parsed ad hoc at match time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCriteria {
    Keyword {
        keywords: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    Pattern {
        pattern: String,
    },
    Length {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    Spam {
        max_links: usize,
        max_caps_ratio: f64,
        max_repeated_chars: usize,
    },
    Profanity {
        words: Vec<String>,
    },
}

impl RuleCriteria {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleCriteria::Keyword { .. } => RuleType::Keyword,
            RuleCriteria::Pattern { .. } => RuleType::Pattern,
            RuleCriteria::Length { .. } => RuleType::Length,
            RuleCriteria::Spam { .. } => RuleType::Spam,
            RuleCriteria::Profanity { .. } => RuleType::Profanity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModerationRule {
    pub id: Uuid,
    pub name: String,
    pub rule_type: RuleType,
    pub content_types: Vec<ContentType>,
    pub criteria: serde_json::Value,
    pub action: RuleAction,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ModerationRule {
    pub fn parsed_criteria(&self) -> Result<RuleCriteria, serde_json::Error> {
        serde_json::from_value(self.criteria.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_tags_round_trip() {
        let c = RuleCriteria::Keyword {
            keywords: vec!["guarantee".to_string()],
            case_sensitive: false,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "keyword");
        let back: RuleCriteria = serde_json::from_value(v).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.rule_type(), RuleType::Keyword);
    }

    #[test]
    fn action_severity_ordering() {
        assert!(RuleAction::Reject > RuleAction::RequireReview);
        assert!(RuleAction::RequireReview > RuleAction::Flag);
        assert!(RuleAction::Flag > RuleAction::AutoApprove);
    }
}

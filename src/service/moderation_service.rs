use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, moderationdb::ModerationExt},
    models::{
        moderationmodel::{ContentType, ModerationRule, RuleAction, RuleCriteria},
        usermodel::User,
    },
    service::{audit_service::AuditService, error::ServiceError},
};

#[derive(Debug, Clone, Serialize)]
pub struct RuleMatch {
    pub rule_id: Uuid,
    pub rule_name: String,
    pub action: RuleAction,
}

#[derive(Debug, Clone)]
pub struct ModerationService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl ModerationService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self { db_client, audit_service }
    }

    pub async fn create_rule(
        &self,
        acting_user: &User,
        name: &str,
        content_types: &[ContentType],
        criteria: RuleCriteria,
        action: RuleAction,
    ) -> Result<ModerationRule, ServiceError> {
        if content_types.is_empty() {
            return Err(ServiceError::Validation(
                "At least one content type is required".to_string(),
            ));
        }

        validate_criteria(&criteria)?;
        let rule_type = criteria.rule_type();

        let criteria_json = serde_json::to_value(&criteria)
            .map_err(|e| ServiceError::InvalidCriteria(e.to_string()))?;

        let mut tx = self.db_client.pool.begin().await?;

        let rule: ModerationRule = sqlx::query_as::<_, ModerationRule>(
            r#"
            INSERT INTO moderation_rules
                (name, rule_type, content_types, criteria, action, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(rule_type)
        .bind(content_types)
        .bind(criteria_json)
        .bind(action)
        .bind(acting_user.id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "moderation_rule_created",
                Some(rule.id),
                None,
                Some(serde_json::json!({ "name": name, "rule_type": rule_type })),
                "Moderation rule created".to_string(),
            )
            .await?;

        tx.commit().await?;

        Ok(rule)
    }

    pub async fn set_rule_active(
        &self,
        acting_user: &User,
        rule_id: Uuid,
        is_active: bool,
    ) -> Result<ModerationRule, ServiceError> {
        self.db_client
            .get_moderation_rule(rule_id)
            .await?
            .ok_or(ServiceError::RuleNotFound(rule_id))?;

        let mut tx = self.db_client.pool.begin().await?;

        let rule: ModerationRule = sqlx::query_as::<_, ModerationRule>(
            r#"
            UPDATE moderation_rules
            SET is_active = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(is_active)
        .bind(rule_id)
        .fetch_one(&mut *tx)
        .await?;

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                if is_active { "moderation_rule_enabled" } else { "moderation_rule_disabled" },
                Some(rule_id),
                None,
                None,
                "Moderation rule toggled".to_string(),
            )
            .await?;

        tx.commit().await?;

        Ok(rule)
    }

    pub async fn delete_rule(&self, acting_user: &User, rule_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM moderation_rules WHERE id = $1")
            .bind(rule_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(ServiceError::RuleNotFound(rule_id));
        }

        self.audit_service
            .log_event_tx(
                &mut tx,
                acting_user.id,
                "moderation_rule_deleted",
                Some(rule_id),
                None,
                None,
                "Moderation rule deleted".to_string(),
            )
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list_rules(&self) -> Result<Vec<ModerationRule>, ServiceError> {
        Ok(self.db_client.get_moderation_rules().await?)
    }

    /// Run all active rules for the content type over the text. When several
    /// rules match, the most severe action wins.
    pub async fn evaluate(
        &self,
        content_type: ContentType,
        text: &str,
    ) -> Result<Option<RuleMatch>, ServiceError> {
        let rules = self.db_client.get_active_rules_for(content_type).await?;

        let mut verdict: Option<RuleMatch> = None;
        for rule in &rules {
            let criteria = match rule.parsed_criteria() {
                Ok(criteria) => criteria,
                Err(e) => {
                    // A malformed stored payload should never block content.
                    tracing::warn!("rule {} has unparseable criteria: {}", rule.id, e);
                    continue;
                }
            };

            if criteria_matches(&criteria, text) {
                let stronger = verdict
                    .as_ref()
                    .map_or(true, |current| rule.action > current.action);
                if stronger {
                    verdict = Some(RuleMatch {
                        rule_id: rule.id,
                        rule_name: rule.name.clone(),
                        action: rule.action,
                    });
                }
            }
        }

        Ok(verdict)
    }
}

/// Criteria are validated when written so match time never fails.
pub fn validate_criteria(criteria: &RuleCriteria) -> Result<(), ServiceError> {
    match criteria {
        RuleCriteria::Keyword { keywords, .. } | RuleCriteria::Profanity { words: keywords } => {
            if keywords.is_empty() || keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ServiceError::InvalidCriteria(
                    "word list must be non-empty".to_string(),
                ));
            }
        }
        RuleCriteria::Pattern { pattern } => {
            regex::Regex::new(pattern)
                .map_err(|e| ServiceError::InvalidCriteria(format!("bad pattern: {}", e)))?;
        }
        RuleCriteria::Length { min_length, max_length } => {
            if min_length.is_none() && max_length.is_none() {
                return Err(ServiceError::InvalidCriteria(
                    "length rule needs min or max".to_string(),
                ));
            }
            if let (Some(min), Some(max)) = (min_length, max_length) {
                if min > max {
                    return Err(ServiceError::InvalidCriteria(
                        "min_length exceeds max_length".to_string(),
                    ));
                }
            }
        }
        RuleCriteria::Spam { max_caps_ratio, .. } => {
            if !(0.0..=1.0).contains(max_caps_ratio) {
                return Err(ServiceError::InvalidCriteria(
                    "max_caps_ratio must be within 0..=1".to_string(),
                ));
            }
        }
    }

    Ok(())
}

pub fn criteria_matches(criteria: &RuleCriteria, text: &str) -> bool {
    match criteria {
        RuleCriteria::Keyword { keywords, case_sensitive } => {
            if *case_sensitive {
                keywords.iter().any(|k| text.contains(k.as_str()))
            } else {
                let lowered = text.to_lowercase();
                keywords.iter().any(|k| lowered.contains(&k.to_lowercase()))
            }
        }
        RuleCriteria::Pattern { pattern } => match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(text),
            Err(_) => false,
        },
        RuleCriteria::Length { min_length, max_length } => {
            let len = text.chars().count();
            min_length.map_or(false, |min| len < min)
                || max_length.map_or(false, |max| len > max)
        }
        RuleCriteria::Spam { max_links, max_caps_ratio, max_repeated_chars } => {
            link_count(text) > *max_links
                || caps_ratio(text) > *max_caps_ratio
                || longest_char_run(text) > *max_repeated_chars
        }
        RuleCriteria::Profanity { words } => {
            let lowered = text.to_lowercase();
            words.iter().any(|w| lowered.contains(&w.to_lowercase()))
        }
    }
}

fn link_count(text: &str) -> usize {
    text.matches("http://").count() + text.matches("https://").count()
}

fn caps_ratio(text: &str) -> f64 {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return 0.0;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f64 / letters.len() as f64
}

fn longest_char_run(text: &str) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if Some(c) == prev {
            current += 1;
        } else {
            current = 1;
            prev = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_matching_respects_case_flag() {
        let insensitive = RuleCriteria::Keyword {
            keywords: vec!["Guarantee".to_string()],
            case_sensitive: false,
        };
        assert!(criteria_matches(&insensitive, "money back GUARANTEE!"));

        let sensitive = RuleCriteria::Keyword {
            keywords: vec!["Guarantee".to_string()],
            case_sensitive: true,
        };
        assert!(!criteria_matches(&sensitive, "money back guarantee!"));
        assert!(criteria_matches(&sensitive, "Guarantee of results"));
    }

    #[test]
    fn pattern_matching() {
        let c = RuleCriteria::Pattern { pattern: r"\b\d{11}\b".to_string() };
        assert!(criteria_matches(&c, "call 79001234567 now"));
        assert!(!criteria_matches(&c, "call me maybe"));
    }

    #[test]
    fn length_rule_flags_out_of_bounds() {
        let c = RuleCriteria::Length { min_length: Some(5), max_length: Some(10) };
        assert!(criteria_matches(&c, "hey"));
        assert!(criteria_matches(&c, "a very long message"));
        assert!(!criteria_matches(&c, "just right"));
    }

    #[test]
    fn spam_heuristics() {
        let c = RuleCriteria::Spam {
            max_links: 1,
            max_caps_ratio: 0.6,
            max_repeated_chars: 4,
        };
        assert!(criteria_matches(&c, "https://a.com https://b.com https://c.com"));
        assert!(criteria_matches(&c, "BUY NOW CHEAP"));
        assert!(criteria_matches(&c, "heyyyyyy"));
        assert!(!criteria_matches(&c, "a normal sentence with one link http://a.com"));
    }

    #[test]
    fn profanity_is_case_insensitive() {
        let c = RuleCriteria::Profanity { words: vec!["scam".to_string()] };
        assert!(criteria_matches(&c, "this is a SCAM"));
        assert!(!criteria_matches(&c, "this is fine"));
    }

    #[test]
    fn invalid_criteria_rejected() {
        assert!(validate_criteria(&RuleCriteria::Keyword {
            keywords: vec![],
            case_sensitive: false
        })
        .is_err());

        assert!(validate_criteria(&RuleCriteria::Pattern { pattern: "(".to_string() }).is_err());

        assert!(validate_criteria(&RuleCriteria::Length {
            min_length: None,
            max_length: None
        })
        .is_err());

        assert!(validate_criteria(&RuleCriteria::Length {
            min_length: Some(10),
            max_length: Some(5)
        })
        .is_err());

        assert!(validate_criteria(&RuleCriteria::Spam {
            max_links: 1,
            max_caps_ratio: 1.5,
            max_repeated_chars: 3
        })
        .is_err());
    }
}

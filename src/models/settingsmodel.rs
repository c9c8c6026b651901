use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed setting payload. The old scheme stored opaque JSON next to a
/// free-text `setting_type` column and re-parsed it on every read; here the
/// value is a tagged union validated once at the write boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingValue {
    Boolean {
        value: bool,
    },
    Number {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    Text {
        value: String,
    },
    Json {
        value: serde_json::Value,
    },
}

impl SettingValue {
    /// Bounds are part of the payload for numbers; a value outside its own
    /// declared range is rejected before it reaches the table.
    pub fn validate(&self) -> Result<(), String> {
        if let SettingValue::Number { value, min, max } = self {
            if !value.is_finite() {
                return Err("number setting must be finite".to_string());
            }
            if let Some(min) = min {
                if value < min {
                    return Err(format!("value {} below minimum {}", value, min));
                }
            }
            if let Some(max) = max {
                if value > max {
                    return Err(format!("value {} above maximum {}", value, max));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemSetting {
    pub setting_key: String,
    pub setting_value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl SystemSetting {
    pub fn parsed_value(&self) -> Result<SettingValue, serde_json::Error> {
        serde_json::from_value(self.setting_value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_bounds_enforced() {
        let ok = SettingValue::Number { value: 5.0, min: Some(1.0), max: Some(10.0) };
        assert!(ok.validate().is_ok());

        let low = SettingValue::Number { value: 0.5, min: Some(1.0), max: None };
        assert!(low.validate().is_err());

        let nan = SettingValue::Number { value: f64::NAN, min: None, max: None };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_untagged_payload() {
        // A bare literal is exactly what the old scheme stored.
        let res: Result<SettingValue, _> = serde_json::from_value(serde_json::json!(true));
        assert!(res.is_err());
    }
}

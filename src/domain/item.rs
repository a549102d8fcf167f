//! Item entity and its validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single persisted record managed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned primary key
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Always `true` on create; no exposed operation changes it
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable attributes of an [`Item`].
///
/// Used for both create and update: an update is a full replace, so a missing
/// `description` clears the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemChanges {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            description,
        }
    }
}

/// Human-readable validation failures, in the order they were detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Message reported when `name` is missing, empty or whitespace only.
pub const NAME_BLANK: &str = "Name can't be blank";

/// Check `changes` against the item rules without touching storage.
///
/// Returns the validated name on success so callers never persist the
/// unchecked `Option`.
pub fn validate(changes: &ItemChanges) -> Result<&str, ValidationErrors> {
    match changes.name.as_deref() {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => {
            let mut errors = ValidationErrors::default();
            errors.push(NAME_BLANK);
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_name() {
        let changes = ItemChanges::new("Widget", None);
        assert_eq!(validate(&changes), Ok("Widget"));
    }

    #[test]
    fn test_validate_rejects_missing_empty_and_blank_names() {
        for name in [None, Some(""), Some("   "), Some("\t\n")] {
            let changes = ItemChanges {
                name: name.map(str::to_string),
                description: Some("d".into()),
            };
            let errors = validate(&changes).unwrap_err();
            assert_eq!(errors.messages(), [NAME_BLANK]);
        }
    }

    #[test]
    fn test_validate_ignores_description() {
        let changes = ItemChanges::new("x", Some(String::new()));
        assert!(validate(&changes).is_ok());
    }

    #[test]
    fn test_validation_errors_serialize_as_array() {
        let mut errors = ValidationErrors::default();
        errors.push(NAME_BLANK);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!([NAME_BLANK]));
    }
}

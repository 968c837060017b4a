//! Customer / user domain types.
//!
//! Both kinds share these types; which table a value came from is decided by
//! the repository that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use accounts_core::{Email, EntityId};

/// A stored customer or user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique ID, assigned on insert.
    pub id: EntityId,
    /// Email address, unique per kind.
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// Whether the email has been confirmed.
    pub email_confirmed: bool,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Whether `needle` (already lowercased) occurs in the first name, last
    /// name, or email, ignoring case.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Validated fields for inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

/// Request body for creating a record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Partial update. Absent fields stay unchanged.
///
/// `phoneNumber` distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`), which clears the stored number.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub phone_number: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl EntityPatch {
    /// Names of the fields present in the patch, in wire (camelCase) form.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.first_name.is_some() {
            fields.push("firstName");
        }
        if self.last_name.is_some() {
            fields.push("lastName");
        }
        if self.phone_number.is_some() {
            fields.push("phoneNumber");
        }
        if self.is_active.is_some() {
            fields.push("isActive");
        }
        fields
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Merge the present fields into `entity`.
    pub fn apply_to(self, entity: &mut Entity) {
        if let Some(first_name) = self.first_name {
            entity.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            entity.last_name = last_name;
        }
        if let Some(phone_number) = self.phone_number {
            entity.phone_number = phone_number;
        }
        if let Some(is_active) = self.is_active {
            entity.is_active = is_active;
        }
    }
}

/// Deserialize a field that may be absent, `null`, or a value.
///
/// Combined with `#[serde(default)]`, absence yields `None` and `null`
/// yields `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Entity {
        let now = Utc::now();
        Entity {
            id: EntityId::new(),
            email: Email::parse("john@example.com").unwrap(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone_number: Some("+1 555 0100".to_string()),
            email_confirmed: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["emailConfirmed"], false);
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn test_missing_phone_serializes_as_null() {
        let mut entity = sample();
        entity.phone_number = None;
        let json = serde_json::to_value(entity).unwrap();
        assert!(json["phoneNumber"].is_null());
    }

    #[test]
    fn test_matches_text_is_case_insensitive() {
        let entity = sample();
        assert!(entity.matches_text("jo"));
        assert!(entity.matches_text("doe"));
        assert!(entity.matches_text("example.com"));
        assert!(!entity.matches_text("smith"));
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: EntityPatch = serde_json::from_str(r#"{"firstName":"Jane"}"#).unwrap();
        assert_eq!(absent.phone_number, None);
        assert_eq!(absent.field_names(), vec!["firstName"]);

        let cleared: EntityPatch = serde_json::from_str(r#"{"phoneNumber":null}"#).unwrap();
        assert_eq!(cleared.phone_number, Some(None));
        assert_eq!(cleared.field_names(), vec!["phoneNumber"]);
    }

    #[test]
    fn test_empty_patch() {
        let patch: EntityPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        let mut entity = sample();
        let before = entity.clone();
        patch.apply_to(&mut entity);
        assert_eq!(entity, before);
    }

    #[test]
    fn test_apply_patch() {
        let patch: EntityPatch =
            serde_json::from_str(r#"{"lastName":"Smith","phoneNumber":null,"isActive":false}"#)
                .unwrap();
        let mut entity = sample();
        patch.apply_to(&mut entity);

        assert_eq!(entity.first_name, "John");
        assert_eq!(entity.last_name, "Smith");
        assert_eq!(entity.phone_number, None);
        assert!(!entity.is_active);
    }
}

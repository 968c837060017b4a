//! Fetch one record by ID.

use serde_json::json;
use tracing::instrument;

use accounts_core::EntityId;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct GetEntity {
    deps: Deps,
}

impl GetEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId) -> Result<Entity, ServiceError> {
        let entity = self.deps.require(id).await?;

        let action = self.deps.action("get_by_id");
        let audit = self
            .deps
            .effects
            .audit
            .log_system_action(&action, json!({ "id": id }))
            .await;
        report_failures(&action, [audit]);

        Ok(entity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use accounts_core::EntityKind;

    use super::*;
    use crate::services::test_support::{seed, use_cases};

    #[tokio::test]
    async fn test_get_after_create_returns_matching_fields() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);
        let created = seed(&use_cases, &recorder, "a@b.com", "A", "B").await;

        let fetched = use_cases.get.handle(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert!(!fetched.email_confirmed);
        assert!(fetched.is_active);
        assert_eq!(recorder.events(), vec!["audit:customers.get_by_id"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (use_cases, recorder) = use_cases(EntityKind::User);
        let id = EntityId::new();

        let err = use_cases.get.handle(id).await.unwrap_err();

        assert_eq!(err.to_string(), format!("User with ID '{id}' not found"));
        assert!(recorder.events().is_empty());
    }
}

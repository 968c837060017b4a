//! Deactivate an active record.

use serde_json::json;
use tracing::instrument;

use accounts_core::EntityId;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct DeactivateEntity {
    deps: Deps,
}

impl DeactivateEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID and
    /// `ServiceError::AlreadyInactive` if it is already inactive.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId) -> Result<Entity, ServiceError> {
        let mut entity = self.deps.require(id).await?;
        if !entity.is_active {
            return Err(ServiceError::AlreadyInactive {
                kind: self.deps.kind(),
                id,
            });
        }

        entity.is_active = false;
        let entity = self.deps.save(&entity).await?;

        let action = self.deps.action("deactivate");
        let fx = &self.deps.effects;
        let (audit, analytics, mail, notify) = tokio::join!(
            fx.audit.log_system_action(&action, json!({ "id": id })),
            fx.analytics.track_deactivation(id, None),
            fx.mailer.send_deactivated(id, &entity.email, None),
            fx.notifier.account_deactivated(id, None),
        );
        report_failures(&action, [audit, analytics, mail, notify]);

        Ok(entity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use accounts_core::EntityKind;

    use crate::services::test_support::{failing_use_cases, seed, use_cases};

    #[tokio::test]
    async fn test_deactivate_then_again_is_rejected() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);
        let created = seed(&use_cases, &recorder, "a@b.com", "A", "B").await;

        let deactivated = use_cases.deactivate.handle(created.id).await.unwrap();
        assert!(!deactivated.is_active);
        assert_eq!(
            recorder.events(),
            vec![
                "analytics:deactivation",
                "audit:customers.deactivate",
                "mail:deactivated",
                "notify:Account Deactivated",
            ]
        );

        let err = use_cases.deactivate.handle(created.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Customer with ID '{}' is already inactive", created.id)
        );
    }

    #[tokio::test]
    async fn test_state_change_survives_failing_side_effects() {
        let (use_cases, recorder) = failing_use_cases(EntityKind::User);
        let created = seed(&use_cases, &recorder, "a@b.com", "A", "B").await;

        use_cases.deactivate.handle(created.id).await.unwrap();

        assert_eq!(recorder.events().len(), 4);
        let stored = use_cases.get.handle(created.id).await.unwrap();
        assert!(!stored.is_active);
    }
}

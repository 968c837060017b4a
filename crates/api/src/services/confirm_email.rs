//! Mark a record's email as confirmed.

use tracing::instrument;

use accounts_core::EntityId;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct ConfirmEmail {
    deps: Deps,
}

impl ConfirmEmail {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Set `emailConfirmed`. Confirming twice is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId) -> Result<Entity, ServiceError> {
        let mut entity = self.deps.require(id).await?;
        entity.email_confirmed = true;
        let entity = self.deps.save(&entity).await?;

        let action = self.deps.action("confirm_email");
        let fx = &self.deps.effects;
        let (audit, analytics, notify) = tokio::join!(
            fx.audit
                .log_user_action(&action, id, serde_json::Value::Null),
            fx.analytics.track_email_confirmation(id),
            fx.notifier.email_confirmed(id),
        );
        report_failures(&action, [audit, analytics, notify]);

        Ok(entity)
    }
}

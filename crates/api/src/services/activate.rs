//! Activate an inactive record.

use serde_json::json;
use tracing::instrument;

use accounts_core::EntityId;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct ActivateEntity {
    deps: Deps,
}

impl ActivateEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID and
    /// `ServiceError::AlreadyActive` if it is already active.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId) -> Result<Entity, ServiceError> {
        let mut entity = self.deps.require(id).await?;
        if entity.is_active {
            return Err(ServiceError::AlreadyActive {
                kind: self.deps.kind(),
                id,
            });
        }

        entity.is_active = true;
        let entity = self.deps.save(&entity).await?;

        let action = self.deps.action("activate");
        let fx = &self.deps.effects;
        let (audit, analytics, mail, notify) = tokio::join!(
            fx.audit.log_system_action(&action, json!({ "id": id })),
            fx.analytics.track_activation(id),
            fx.mailer.send_activated(id, &entity.email),
            fx.notifier.account_activated(id),
        );
        report_failures(&action, [audit, analytics, mail, notify]);

        Ok(entity)
    }
}

//! Hard-delete a record.

use serde_json::json;
use tracing::instrument;

use accounts_core::EntityId;

use super::{Deps, ServiceError};
use crate::effects::report_failures;

#[derive(Clone)]
pub struct DeleteEntity {
    deps: Deps,
}

impl DeleteEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId) -> Result<(), ServiceError> {
        self.deps.require(id).await?;
        self.deps.repo.delete(id).await?;

        tracing::info!(%id, "{} deleted", self.deps.kind());

        let action = self.deps.action("delete");
        let audit = self
            .deps
            .effects
            .audit
            .log_system_action(&action, json!({ "id": id }))
            .await;
        report_failures(&action, [audit]);

        Ok(())
    }
}

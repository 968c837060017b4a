//! List all records.

use tracing::instrument;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct ListEntities {
    deps: Deps,
}

impl ListEntities {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self) -> Result<Vec<Entity>, ServiceError> {
        let entities = self.deps.repo.find_all().await?;

        let action = self.deps.action("list_all");
        let query = format!("all_{}", self.deps.kind().resource());
        let fx = &self.deps.effects;
        let (audit, analytics) = tokio::join!(
            fx.audit.log_system_action(&action, serde_json::Value::Null),
            fx.analytics.track_search(&query, None),
        );
        report_failures(&action, [audit, analytics]);

        Ok(entities)
    }
}

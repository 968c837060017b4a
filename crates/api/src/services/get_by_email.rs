//! Fetch one record by email.

use serde_json::json;
use tracing::instrument;

use accounts_core::Email;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

#[derive(Clone)]
pub struct GetEntityByEmail {
    deps: Deps,
}

impl GetEntityByEmail {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Look up by exact email. A malformed address cannot match any record
    /// and is reported the same way as a missing one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmailNotFound` if no record has this email.
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, email: &str) -> Result<Entity, ServiceError> {
        let kind = self.deps.kind();
        let not_found = || ServiceError::EmailNotFound {
            kind,
            email: email.to_owned(),
        };

        let parsed = Email::parse(email).map_err(|_| not_found())?;
        let entity = self
            .deps
            .repo
            .find_by_email(&parsed)
            .await?
            .ok_or_else(not_found)?;

        let action = self.deps.action("get_by_email");
        let audit = self
            .deps
            .effects
            .audit
            .log_system_action(&action, json!({ "email": parsed }))
            .await;
        report_failures(&action, [audit]);

        Ok(entity)
    }
}

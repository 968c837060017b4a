//! Partial update of a record.

use serde_json::json;
use tracing::instrument;

use accounts_core::EntityId;

use super::create::required;
use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::{Entity, EntityPatch};

#[derive(Clone)]
pub struct UpdateEntity {
    deps: Deps,
}

impl UpdateEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Merge the fields present in `patch`. An empty patch writes nothing
    /// and returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no record has this ID and
    /// `ServiceError::Validation` if a name is set to a blank value.
    #[instrument(skip(self, patch), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, id: EntityId, patch: EntityPatch) -> Result<Entity, ServiceError> {
        let mut entity = self.deps.require(id).await?;
        let patch = normalize(patch)?;
        let fields = patch.field_names();

        if !patch.is_empty() {
            patch.apply_to(&mut entity);
            entity = self.deps.save(&entity).await?;
            tracing::info!(%id, ?fields, "Profile updated");
        }

        let action = self.deps.action("update");
        let fx = &self.deps.effects;
        let (audit, analytics) = tokio::join!(
            fx.audit
                .log_user_action(&action, id, json!({ "updatedFields": fields })),
            fx.analytics.track_profile_update(id, &fields),
        );
        report_failures(&action, [audit, analytics]);

        Ok(entity)
    }
}

/// Trim names and phone number; a blank phone number clears it.
fn normalize(mut patch: EntityPatch) -> Result<EntityPatch, ServiceError> {
    if let Some(first_name) = patch.first_name.as_deref() {
        patch.first_name = Some(required("firstName", first_name)?);
    }
    if let Some(last_name) = patch.last_name.as_deref() {
        patch.last_name = Some(required("lastName", last_name)?);
    }
    if let Some(Some(phone)) = patch.phone_number.as_ref() {
        let phone = phone.trim();
        patch.phone_number = Some((!phone.is_empty()).then(|| phone.to_owned()));
    }
    Ok(patch)
}

//! Register a new customer or user.

use serde_json::json;
use tracing::instrument;

use accounts_core::Email;

use super::{Deps, ServiceError};
use crate::db::RepositoryError;
use crate::effects::report_failures;
use crate::models::{CreateEntityRequest, Entity, NewEntity};

/// Creates a record with `emailConfirmed = false` and `isActive = true`.
#[derive(Clone)]
pub struct CreateEntity {
    deps: Deps,
}

impl CreateEntity {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a malformed email or blank
    /// names, and `ServiceError::EmailAlreadyExists` if the email is taken.
    #[instrument(skip(self, request), fields(kind = %self.deps.kind(), email = %request.email))]
    pub async fn handle(&self, request: CreateEntityRequest) -> Result<Entity, ServiceError> {
        let kind = self.deps.kind();
        let new = validate(request)?;

        if self.deps.repo.find_by_email(&new.email).await?.is_some() {
            return Err(ServiceError::EmailAlreadyExists {
                kind,
                email: new.email.into_inner(),
            });
        }

        let email = new.email.to_string();
        let entity = self.deps.repo.insert(new).await.map_err(|e| match e {
            // Lost a race with a concurrent create.
            RepositoryError::Conflict(_) => ServiceError::EmailAlreadyExists { kind, email },
            other => ServiceError::Repository(other),
        })?;

        tracing::info!(id = %entity.id, "{kind} created");

        let action = self.deps.action("create");
        let fx = &self.deps.effects;
        let (audit, analytics, mail, notify) = tokio::join!(
            fx.audit.log_system_action(
                &action,
                json!({ "id": entity.id, "email": entity.email }),
            ),
            fx.analytics.track_registration(entity.id, &entity.email),
            fx.mailer
                .send_welcome(entity.id, &entity.email, &entity.first_name),
            fx.notifier.welcome(entity.id, &entity.first_name),
        );
        report_failures(&action, [audit, analytics, mail, notify]);

        Ok(entity)
    }
}

fn validate(request: CreateEntityRequest) -> Result<NewEntity, ServiceError> {
    let email = Email::parse(&request.email)
        .map_err(|e| ServiceError::Validation(format!("Invalid email: {e}")))?;

    Ok(NewEntity {
        email,
        first_name: required("firstName", &request.first_name)?,
        last_name: required("lastName", &request.last_name)?,
        phone_number: request
            .phone_number
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty()),
    })
}

/// Trimmed value of a required text field.
pub(super) fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use accounts_core::EntityKind;

    use super::*;
    use crate::services::test_support::{
        Race, Racing, failing_use_cases, request, use_cases, use_cases_over,
    };

    #[tokio::test]
    async fn test_create_sets_defaults_and_dispatches() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);

        let entity = use_cases
            .create
            .handle(request("a@b.com", "A", "B"))
            .await
            .unwrap();

        assert_eq!(entity.email.as_str(), "a@b.com");
        assert!(!entity.email_confirmed);
        assert!(entity.is_active);
        assert_eq!(
            recorder.events(),
            vec![
                "analytics:registration",
                "audit:customers.create",
                "mail:welcome",
                "notify:Welcome!",
            ]
        );

        let audit = recorder.audit_entries();
        assert_eq!(audit[0].actor, None);
        assert_eq!(audit[0].details["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_without_write() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);
        use_cases
            .create
            .handle(request("a@b.com", "A", "B"))
            .await
            .unwrap();
        recorder.clear();

        let err = use_cases
            .create
            .handle(request("a@b.com", "C", "D"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Customer with email 'a@b.com' already exists"
        );
        assert!(recorder.events().is_empty());
        assert_eq!(use_cases.list.handle().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_conflict_after_lookup_miss_is_rejected() {
        let repo = Racing::new(EntityKind::Customer, Race::EmailLookupMisses);
        let (use_cases, recorder) = use_cases_over(repo);
        use_cases
            .create
            .handle(request("a@b.com", "A", "B"))
            .await
            .unwrap();
        recorder.clear();

        let err = use_cases
            .create
            .handle(request("a@b.com", "C", "D"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::EmailAlreadyExists { ref email, .. } if email == "a@b.com"
        ));
        assert!(recorder.events().is_empty());
        assert_eq!(use_cases.list.handle().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation() {
        let (use_cases, _) = use_cases(EntityKind::User);

        let err = use_cases
            .create
            .handle(request("not-an-email", "A", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = use_cases
            .create
            .handle(request("a@b.com", "   ", "B"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "firstName must not be empty");
    }

    #[tokio::test]
    async fn test_blank_phone_is_stored_as_none() {
        let (use_cases, _) = use_cases(EntityKind::User);
        let mut req = request("a@b.com", " Ada ", "Lovelace");
        req.phone_number = Some("  ".to_string());

        let entity = use_cases.create.handle(req).await.unwrap();
        assert_eq!(entity.first_name, "Ada");
        assert_eq!(entity.phone_number, None);
    }

    #[tokio::test]
    async fn test_failing_side_effects_do_not_fail_create() {
        let (use_cases, recorder) = failing_use_cases(EntityKind::User);

        let entity = use_cases
            .create
            .handle(request("a@b.com", "A", "B"))
            .await
            .unwrap();

        assert_eq!(recorder.events().len(), 4);
        assert!(use_cases.get.handle(entity.id).await.is_ok());
    }
}

//! Substring search over names and email.

use serde_json::json;
use tracing::instrument;

use super::{Deps, ServiceError};
use crate::effects::report_failures;
use crate::models::Entity;

/// Shortest accepted query, in characters, after trimming.
pub const MIN_QUERY_LENGTH: usize = 2;

#[derive(Clone)]
pub struct SearchEntities {
    deps: Deps,
}

impl SearchEntities {
    pub(super) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Records whose first name, last name, or email contains the trimmed
    /// query, ignoring case. Newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidSearchQuery` if the trimmed query is
    /// shorter than [`MIN_QUERY_LENGTH`].
    #[instrument(skip(self), fields(kind = %self.deps.kind()))]
    pub async fn handle(&self, query: &str) -> Result<Vec<Entity>, ServiceError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LENGTH {
            return Err(ServiceError::InvalidSearchQuery(query.to_owned()));
        }

        let entities = self.deps.repo.search(trimmed).await?;
        tracing::debug!(results = entities.len(), "Search complete");

        let action = self.deps.action("search");
        let fx = &self.deps.effects;
        let (audit, analytics) = tokio::join!(
            fx.audit
                .log_system_action(&action, json!({ "query": trimmed })),
            fx.analytics.track_search(trimmed, None),
        );
        report_failures(&action, [audit, analytics]);

        Ok(entities)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use accounts_core::EntityKind;

    use super::*;
    use crate::services::test_support::{seed, use_cases};

    #[tokio::test]
    async fn test_short_query_is_invalid() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);

        let err = use_cases.search.handle("a").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Search query 'a' is invalid. Query must be at least 2 characters long."
        );

        let err = use_cases.search.handle("  b ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSearchQuery(_)));
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_names_and_email() {
        let (use_cases, recorder) = use_cases(EntityKind::Customer);
        seed(&use_cases, &recorder, "john@x.io", "John", "Doe").await;
        seed(&use_cases, &recorder, "amy@x.io", "Amy", "Jordan").await;
        seed(&use_cases, &recorder, "zed@jo.io", "Zed", "Null").await;
        seed(&use_cases, &recorder, "bob@x.io", "Bob", "Smith").await;

        let found = use_cases.search.handle(" jo ").await.unwrap();

        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|e| e.first_name != "Bob"));
        assert_eq!(
            recorder.events(),
            vec!["analytics:search:jo", "audit:customers.search"]
        );
    }

    #[tokio::test]
    async fn test_wildcards_match_literally() {
        let (use_cases, recorder) = use_cases(EntityKind::User);
        seed(&use_cases, &recorder, "plain@x.io", "Plain", "Name").await;

        assert!(use_cases.search.handle("%%").await.unwrap().is_empty());
    }
}

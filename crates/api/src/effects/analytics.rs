//! Product analytics collaborator.

use async_trait::async_trait;

use accounts_core::{Email, EntityId};

use super::EffectResult;

/// Sink for analytics events.
#[async_trait]
pub trait Analytics: Send + Sync {
    /// A new account was registered.
    async fn track_registration(&self, id: EntityId, email: &Email) -> EffectResult;

    /// An account confirmed its email address.
    async fn track_email_confirmation(&self, id: EntityId) -> EffectResult;

    /// An account was activated.
    async fn track_activation(&self, id: EntityId) -> EffectResult;

    /// An account was deactivated.
    async fn track_deactivation(&self, id: EntityId, reason: Option<&str>) -> EffectResult;

    /// A search or listing ran. `actor` is `None` for anonymous requests.
    async fn track_search(&self, query: &str, actor: Option<EntityId>) -> EffectResult;

    /// Profile fields were updated.
    async fn track_profile_update(&self, id: EntityId, fields: &[&str]) -> EffectResult;
}

/// Analytics sink that emits `tracing` events on the `analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnalytics;

#[async_trait]
impl Analytics for LogAnalytics {
    async fn track_registration(&self, id: EntityId, email: &Email) -> EffectResult {
        tracing::info!(target: "analytics", event = "user_registered", %id, email = %email);
        Ok(())
    }

    async fn track_email_confirmation(&self, id: EntityId) -> EffectResult {
        tracing::info!(target: "analytics", event = "email_confirmed", %id);
        Ok(())
    }

    async fn track_activation(&self, id: EntityId) -> EffectResult {
        tracing::info!(target: "analytics", event = "user_activated", %id);
        Ok(())
    }

    async fn track_deactivation(&self, id: EntityId, reason: Option<&str>) -> EffectResult {
        tracing::info!(
            target: "analytics",
            event = "user_deactivated",
            %id,
            reason = reason.unwrap_or("unspecified")
        );
        Ok(())
    }

    async fn track_search(&self, query: &str, actor: Option<EntityId>) -> EffectResult {
        tracing::info!(
            target: "analytics",
            event = "search_performed",
            query = %query,
            actor = ?actor
        );
        Ok(())
    }

    async fn track_profile_update(&self, id: EntityId, fields: &[&str]) -> EffectResult {
        tracing::info!(
            target: "analytics",
            event = "profile_updated",
            %id,
            fields = ?fields
        );
        Ok(())
    }
}

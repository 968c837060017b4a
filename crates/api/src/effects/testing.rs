//! Recording collaborator for service and handler tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use accounts_core::{Email, EntityId};

use super::{
    Analytics, AuditEntry, AuditLog, EffectResult, Mailer, Notification, Notifier, SideEffectError,
    SideEffects,
};

/// Records every collaborator call as a short event string, e.g.
/// `audit:customers.create` or `mail:welcome`. When `failing` is set, each
/// call is recorded and then reported as a delivery failure.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
    audit: Mutex<Vec<AuditEntry>>,
    failing: bool,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    /// A bundle routing all four collaborators to `self`.
    pub fn side_effects(self: &Arc<Self>) -> SideEffects {
        SideEffects::new(self.clone(), self.clone(), self.clone(), self.clone())
    }

    pub fn events(&self) -> Vec<String> {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        // Dispatch is concurrent, so compare in a stable order.
        events.sort();
        events
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.audit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, event: String) -> EffectResult {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        if self.failing {
            return Err(SideEffectError::Delivery(event));
        }
        Ok(())
    }
}

#[async_trait]
impl AuditLog for Recorder {
    async fn log_action(&self, entry: AuditEntry) -> EffectResult {
        let event = format!("audit:{}", entry.action);
        self.audit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        self.record(event)
    }
}

#[async_trait]
impl Analytics for Recorder {
    async fn track_registration(&self, _id: EntityId, _email: &Email) -> EffectResult {
        self.record("analytics:registration".to_owned())
    }

    async fn track_email_confirmation(&self, _id: EntityId) -> EffectResult {
        self.record("analytics:email_confirmation".to_owned())
    }

    async fn track_activation(&self, _id: EntityId) -> EffectResult {
        self.record("analytics:activation".to_owned())
    }

    async fn track_deactivation(&self, _id: EntityId, _reason: Option<&str>) -> EffectResult {
        self.record("analytics:deactivation".to_owned())
    }

    async fn track_search(&self, query: &str, _actor: Option<EntityId>) -> EffectResult {
        self.record(format!("analytics:search:{query}"))
    }

    async fn track_profile_update(&self, _id: EntityId, fields: &[&str]) -> EffectResult {
        self.record(format!("analytics:profile_update:{}", fields.join(",")))
    }
}

#[async_trait]
impl Mailer for Recorder {
    async fn send_welcome(&self, _id: EntityId, _to: &Email, _first_name: &str) -> EffectResult {
        self.record("mail:welcome".to_owned())
    }

    async fn send_activated(&self, _id: EntityId, _to: &Email) -> EffectResult {
        self.record("mail:activated".to_owned())
    }

    async fn send_deactivated(
        &self,
        _id: EntityId,
        _to: &Email,
        _reason: Option<&str>,
    ) -> EffectResult {
        self.record("mail:deactivated".to_owned())
    }
}

#[async_trait]
impl Notifier for Recorder {
    async fn send(&self, notification: Notification) -> EffectResult {
        self.record(format!("notify:{}", notification.title))
    }
}

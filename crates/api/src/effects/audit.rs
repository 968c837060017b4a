//! Audit trail collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use accounts_core::EntityId;

use super::EffectResult;

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Namespaced action, e.g. `customers.update`.
    pub action: String,
    /// Who performed the action; `None` for system actions.
    pub actor: Option<EntityId>,
    /// Which record the action touched.
    pub target: Option<EntityId>,
    /// Free-form details.
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

/// Destination for audit records.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Record an audit entry.
    async fn log_action(&self, entry: AuditEntry) -> EffectResult;

    /// Record an action performed by (and on) the entity `id`.
    async fn log_user_action(&self, action: &str, id: EntityId, details: Value) -> EffectResult {
        self.log_action(AuditEntry {
            action: action.to_owned(),
            actor: Some(id),
            target: Some(id),
            details,
            timestamp: Utc::now(),
        })
        .await
    }

    /// Record an action performed by the system.
    async fn log_system_action(&self, action: &str, details: Value) -> EffectResult {
        self.log_action(AuditEntry {
            action: action.to_owned(),
            actor: None,
            target: None,
            details,
            timestamp: Utc::now(),
        })
        .await
    }
}

/// Audit log that writes entries as `tracing` events on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuditLog;

#[async_trait]
impl AuditLog for LogAuditLog {
    async fn log_action(&self, entry: AuditEntry) -> EffectResult {
        tracing::info!(
            target: "audit",
            action = %entry.action,
            actor = ?entry.actor,
            target_id = ?entry.target,
            details = %entry.details,
            "Audit event"
        );
        Ok(())
    }
}

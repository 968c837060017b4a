//! Side-effect collaborators invoked after a use case runs.
//!
//! # Collaborators
//!
//! - [`AuditLog`] - audit trail of user and system actions
//! - [`Analytics`] - product analytics events
//! - [`Mailer`] - transactional account emails
//! - [`Notifier`] - in-app notifications
//!
//! Services receive all four through a [`SideEffects`] bundle. The caller
//! picks the implementations: [`SideEffects::logging`] emits structured
//! `tracing` events, [`SideEffects::noop`] discards everything, and an
//! [`SmtpMailer`] can replace the logging mailer.
//!
//! # Failure policy
//!
//! Collaborators for one use case run concurrently and their failures are
//! reported through [`report_failures`] as warnings. They never fail the
//! use case itself.

pub mod analytics;
pub mod audit;
pub mod mailing;
pub mod notifications;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use accounts_core::{Email, EntityId};

pub use analytics::{Analytics, LogAnalytics};
pub use audit::{AuditEntry, AuditLog, LogAuditLog};
pub use mailing::{LogMailer, Mailer, SmtpMailer};
pub use notifications::{LogNotifier, Notification, NotificationLevel, Notifier};

/// Errors reported by a side-effect collaborator.
#[derive(Debug, Error)]
pub enum SideEffectError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build an email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Email template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Address rejected by the mail builder.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Any other delivery failure.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Result type for collaborator calls.
pub type EffectResult = Result<(), SideEffectError>;

/// The four collaborators a use case may call.
#[derive(Clone)]
pub struct SideEffects {
    pub audit: Arc<dyn AuditLog>,
    pub analytics: Arc<dyn Analytics>,
    pub mailer: Arc<dyn Mailer>,
    pub notifier: Arc<dyn Notifier>,
}

impl SideEffects {
    /// Bundle explicit collaborator implementations.
    #[must_use]
    pub fn new(
        audit: Arc<dyn AuditLog>,
        analytics: Arc<dyn Analytics>,
        mailer: Arc<dyn Mailer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            audit,
            analytics,
            mailer,
            notifier,
        }
    }

    /// Collaborators that only emit `tracing` events.
    #[must_use]
    pub fn logging() -> Self {
        Self::new(
            Arc::new(LogAuditLog),
            Arc::new(LogAnalytics),
            Arc::new(LogMailer),
            Arc::new(LogNotifier),
        )
    }

    /// Collaborators that do nothing.
    #[must_use]
    pub fn noop() -> Self {
        let noop = Arc::new(Noop);
        Self::new(noop.clone(), noop.clone(), noop.clone(), noop)
    }

    /// Replace the mailer, keeping the other collaborators.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}

impl std::fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffects").finish_non_exhaustive()
    }
}

/// Log every failed collaborator result for `action` and return how many
/// failed.
pub fn report_failures<I>(action: &str, results: I) -> usize
where
    I: IntoIterator<Item = EffectResult>,
{
    let mut failures = 0;
    for result in results {
        if let Err(e) = result {
            failures += 1;
            tracing::warn!(action = %action, error = %e, "Side effect failed");
        }
    }
    failures
}

/// Collaborator that accepts every event and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

#[async_trait]
impl AuditLog for Noop {
    async fn log_action(&self, _entry: AuditEntry) -> EffectResult {
        Ok(())
    }
}

#[async_trait]
impl Analytics for Noop {
    async fn track_registration(&self, _id: EntityId, _email: &Email) -> EffectResult {
        Ok(())
    }

    async fn track_email_confirmation(&self, _id: EntityId) -> EffectResult {
        Ok(())
    }

    async fn track_activation(&self, _id: EntityId) -> EffectResult {
        Ok(())
    }

    async fn track_deactivation(&self, _id: EntityId, _reason: Option<&str>) -> EffectResult {
        Ok(())
    }

    async fn track_search(&self, _query: &str, _actor: Option<EntityId>) -> EffectResult {
        Ok(())
    }

    async fn track_profile_update(&self, _id: EntityId, _fields: &[&str]) -> EffectResult {
        Ok(())
    }
}

#[async_trait]
impl Mailer for Noop {
    async fn send_welcome(&self, _id: EntityId, _to: &Email, _first_name: &str) -> EffectResult {
        Ok(())
    }

    async fn send_activated(&self, _id: EntityId, _to: &Email) -> EffectResult {
        Ok(())
    }

    async fn send_deactivated(
        &self,
        _id: EntityId,
        _to: &Email,
        _reason: Option<&str>,
    ) -> EffectResult {
        Ok(())
    }
}

#[async_trait]
impl Notifier for Noop {
    async fn send(&self, _notification: Notification) -> EffectResult {
        Ok(())
    }
}

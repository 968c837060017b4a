//! In-app notification collaborator.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use accounts_core::EntityId;

use super::EffectResult;

/// Severity shown with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: EntityId,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub data: Value,
}

impl Notification {
    fn new(user_id: EntityId, level: NotificationLevel, title: &str, message: String) -> Self {
        Self {
            user_id,
            level,
            title: title.to_owned(),
            message,
            data: Value::Null,
        }
    }
}

/// Delivery channel for notifications.
///
/// Implementors provide [`send`](Self::send); the account lifecycle
/// notifications are built on top of it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    async fn send(&self, notification: Notification) -> EffectResult;

    async fn welcome(&self, id: EntityId, first_name: &str) -> EffectResult {
        self.send(Notification::new(
            id,
            NotificationLevel::Success,
            "Welcome!",
            format!("Welcome to our platform, {first_name}! We're excited to have you on board."),
        ))
        .await
    }

    async fn email_confirmed(&self, id: EntityId) -> EffectResult {
        self.send(Notification::new(
            id,
            NotificationLevel::Success,
            "Email Confirmed",
            "Your email address has been successfully confirmed.".to_owned(),
        ))
        .await
    }

    async fn account_activated(&self, id: EntityId) -> EffectResult {
        self.send(Notification::new(
            id,
            NotificationLevel::Success,
            "Account Activated",
            "Your account has been activated. You can now access all features.".to_owned(),
        ))
        .await
    }

    async fn account_deactivated(&self, id: EntityId, reason: Option<&str>) -> EffectResult {
        let message = reason.map_or_else(
            || "Your account has been deactivated.".to_owned(),
            |reason| format!("Your account has been deactivated. Reason: {reason}"),
        );
        let mut notification =
            Notification::new(id, NotificationLevel::Warning, "Account Deactivated", message);
        notification.data = json!({ "reason": reason });
        self.send(notification).await
    }
}

/// Notifier that emits `tracing` events on the `notifications` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: Notification) -> EffectResult {
        tracing::info!(
            target: "notifications",
            user_id = %notification.user_id,
            level = notification.level.as_str(),
            title = %notification.title,
            message = %notification.message,
            "Notification sent"
        );
        Ok(())
    }
}

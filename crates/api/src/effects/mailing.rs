//! Transactional account emails.
//!
//! [`SmtpMailer`] delivers over SMTP via lettre with Askama templates
//! (multipart text + HTML). [`LogMailer`] only records what would be sent.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;

use accounts_core::{Email, EntityId};

use super::{EffectResult, SideEffectError};
use crate::config::EmailConfig;

/// Sender of account lifecycle emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Welcome email after registration.
    async fn send_welcome(&self, id: EntityId, to: &Email, first_name: &str) -> EffectResult;

    /// Account activated.
    async fn send_activated(&self, id: EntityId, to: &Email) -> EffectResult;

    /// Account deactivated, optionally with a reason.
    async fn send_deactivated(
        &self,
        id: EntityId,
        to: &Email,
        reason: Option<&str>,
    ) -> EffectResult;
}

/// Mailer that emits `tracing` events on the `mailing` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_welcome(&self, id: EntityId, to: &Email, first_name: &str) -> EffectResult {
        tracing::info!(
            target: "mailing",
            %id,
            to = %to,
            first_name = %first_name,
            "Welcome email queued"
        );
        Ok(())
    }

    async fn send_activated(&self, id: EntityId, to: &Email) -> EffectResult {
        tracing::info!(target: "mailing", %id, to = %to, "Account activation email queued");
        Ok(())
    }

    async fn send_deactivated(
        &self,
        id: EntityId,
        to: &Email,
        reason: Option<&str>,
    ) -> EffectResult {
        tracing::info!(
            target: "mailing",
            %id,
            to = %to,
            reason = reason.unwrap_or("unspecified"),
            "Account deactivation email queued"
        );
        Ok(())
    }
}

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    first_name: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    first_name: &'a str,
}

/// HTML template for activation / deactivation emails.
#[derive(Template)]
#[template(path = "email/account_status.html")]
struct AccountStatusEmailHtml<'a> {
    activated: bool,
    reason: Option<&'a str>,
}

/// Plain text template for activation / deactivation emails.
#[derive(Template)]
#[template(path = "email/account_status.txt")]
struct AccountStatusEmailText<'a> {
    activated: bool,
    reason: Option<&'a str>,
}

/// SMTP mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    async fn send_status(&self, to: &Email, activated: bool, reason: Option<&str>) -> EffectResult {
        let html = AccountStatusEmailHtml { activated, reason }.render()?;
        let text = AccountStatusEmailText { activated, reason }.render()?;
        let subject = if activated {
            "Your account has been activated"
        } else {
            "Your account has been deactivated"
        };

        self.send_multipart(to, subject, &text, &html).await
    }

    async fn send_multipart(
        &self,
        to: &Email,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> EffectResult {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| SideEffectError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| SideEffectError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.transport.send(message).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_welcome(&self, _id: EntityId, to: &Email, first_name: &str) -> EffectResult {
        let html = WelcomeEmailHtml { first_name }.render()?;
        let text = WelcomeEmailText { first_name }.render()?;

        self.send_multipart(to, "Welcome aboard", &text, &html).await
    }

    async fn send_activated(&self, _id: EntityId, to: &Email) -> EffectResult {
        self.send_status(to, true, None).await
    }

    async fn send_deactivated(
        &self,
        _id: EntityId,
        to: &Email,
        reason: Option<&str>,
    ) -> EffectResult {
        self.send_status(to, false, reason).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_templates_render_name() {
        let html = WelcomeEmailHtml { first_name: "Ada" }.render().unwrap();
        let text = WelcomeEmailText { first_name: "Ada" }.render().unwrap();
        assert!(html.contains("Ada"));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn test_status_templates() {
        let activated = AccountStatusEmailText {
            activated: true,
            reason: None,
        }
        .render()
        .unwrap();
        assert!(activated.contains("activated"));
        assert!(!activated.contains("Reason"));

        let deactivated = AccountStatusEmailHtml {
            activated: false,
            reason: Some("billing"),
        }
        .render()
        .unwrap();
        assert!(deactivated.contains("deactivated"));
        assert!(deactivated.contains("billing"));
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let to = Email::parse("ada@example.com").unwrap();
        let id = EntityId::new();
        assert!(LogMailer.send_welcome(id, &to, "Ada").await.is_ok());
        assert!(LogMailer.send_deactivated(id, &to, None).await.is_ok());
    }
}

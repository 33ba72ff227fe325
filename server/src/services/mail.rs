//! Mail transport
//!
//! Reminder emails go out through an SMTP relay when credentials are
//! configured. Without credentials delivery is simulated: the message is
//! logged and reported as sent.

use super::settings::MailSettings;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// A formatted HTML email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Sends reminder emails
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<()>;

    /// True when messages are only logged
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Logs messages instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMailer;

#[async_trait]
impl MailTransport for SimulatedMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        tracing::info!(
            "[simulated email] to={} subject={:?}",
            message.to,
            message.subject
        );
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// SMTP relay transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self> {
        let (user, password) = settings
            .credentials()
            .ok_or_else(|| AppError::Mail("SMTP credentials are not configured".to_string()))?;

        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| AppError::Mail(format!("Failed to configure SMTP relay: {}", e)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        tracing::info!(
            "SMTP transport configured for {}:{} (secure: {})",
            settings.host,
            settings.port,
            settings.secure
        );

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid sender {:?}: {}", message.from, e)))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient {:?}: {}", message.to, e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| AppError::Mail(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP delivery failed: {}", e)))?;

        Ok(())
    }
}

/// Pick the transport implied by `settings`
pub fn mailer_from_settings(settings: &MailSettings) -> Result<Arc<dyn MailTransport>> {
    if settings.is_simulated() {
        tracing::warn!("SMTP credentials not set; reminder emails will be simulated");
        return Ok(Arc::new(SimulatedMailer));
    }

    Ok(Arc::new(SmtpMailer::new(settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_mailer_always_succeeds() {
        let mailer = SimulatedMailer;
        let message = MailMessage {
            from: "calendar@agency.local".to_string(),
            to: "marketing@agency.local".to_string(),
            subject: "Reminder".to_string(),
            html: "<p>Hi</p>".to_string(),
        };

        mailer.send(&message).await.unwrap();
        assert!(mailer.is_simulated());
    }

    #[test]
    fn test_missing_credentials_select_simulation() {
        let mailer = mailer_from_settings(&MailSettings::default()).unwrap();
        assert!(mailer.is_simulated());
    }

    #[tokio::test]
    async fn test_credentials_select_smtp() {
        let settings = MailSettings {
            host: "smtp.example.com".to_string(),
            user: Some("mailer".to_string()),
            password: Some("secret".to_string()),
            ..MailSettings::default()
        };

        let mailer = mailer_from_settings(&settings).unwrap();
        assert!(!mailer.is_simulated());
    }
}

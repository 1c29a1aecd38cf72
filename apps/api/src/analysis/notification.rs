//! Acceptance notification: pluggable transport for the congratulatory email.
//!
//! Default: `SmtpNotifier` (lettre, STARTTLS relay with credentials).
//! Fallback: `DisabledNotifier` when no mail settings are configured.
//!
//! Send failures are returned as `NotificationError`; the pipeline downgrades them to
//! `email_sent = false` and never fails a request because of them.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::MailConfig;

pub const ACCEPTANCE_SUBJECT: &str = "Congratulations! You have been selected";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email notifications are not configured")]
    Disabled,
}

/// Delivers one message per call. Implementations must not retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotificationError>;
}

/// HTML body of the acceptance email, embedding the candidate's overall score.
pub fn acceptance_body(overall_score: f64) -> String {
    format!(
        r#"<html>
    <body style="font-family: Arial, sans-serif; padding: 20px;">
        <h2>Congratulations!</h2>
        <p>Your profile has been <strong>selected</strong>.</p>
        <p><strong>Score:</strong> {overall_score:.2}/10</p>
        <p>We will be in touch soon.</p>
        <br>
        <p>Best regards,<br>The Recruiting Team</p>
    </body>
</html>"#
    )
}

// ────────────────────────────────────────────────────────────────────────────
// SmtpNotifier
// ────────────────────────────────────────────────────────────────────────────

/// SMTP notifier. The transport keeps a connection pool and is shared by all requests.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.username.parse()?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledNotifier
// ────────────────────────────────────────────────────────────────────────────

/// Used when `MAILER_EMAIL` is not set. Every send fails with `Disabled`.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_body: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Disabled)
    }
}

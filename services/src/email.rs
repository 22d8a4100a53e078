//! Outbound mail gateway.
//!
//! The gateway contract is a single operation: `send(to, subject, html_body)`.
//! `SmtpMailer` is the production implementation on top of `lettre`; callers
//! hold the gateway as a `Mailer` trait object so tests can substitute a
//! recording double.
//!
//! # Environment Variables
//! - `SMTP_HOST` / `SMTP_PORT`: relay to submit through (STARTTLS)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD`: relay credentials
//! - `EMAIL_FROM_ADDRESS` / `EMAIL_FROM_NAME`: sender identity

use async_trait::async_trait;
use common::config;
use lettre::{
    message::{header, Mailbox, Message},
    transport::smtp::{authentication::Credentials, AsyncSmtpTransport},
    AsyncTransport, Tokio1Executor,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid mail address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("smtp transport failure: {0}")]
    Transport(String),
}

/// Single-operation mail gateway: one HTML message per call.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailerError>;
}

/// SMTP submission client configured from the global config.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config() -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config::smtp_host())
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(config::smtp_port())
            .credentials(Credentials::new(
                config::smtp_username(),
                config::smtp_password(),
            ))
            .build();

        let from = format!(
            "{} <{}>",
            config::email_from_name(),
            config::email_from_address()
        )
        .parse()
        .map_err(|e: lettre::address::AddressError| MailerError::Address(e.to_string()))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailerError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::Address(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailerError::Transport(e.to_string()))
    }
}

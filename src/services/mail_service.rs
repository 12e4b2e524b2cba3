//! Outgoing mail for the contact form: an SMTP transport behind `Mailer` and
//! the HTML template the messages are rendered with.

use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Serialize;

use crate::utils::{AppError, AppResult};

const EMAIL_TEMPLATE: &str = include_str!("../../templates/email.hbs");

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends an HTML message to `to`.
    async fn send(&self, to: &str, subject: &str, html: String) -> AppResult<()>;
}

/// Values filled into `templates/email.hbs`. All of them are HTML-escaped.
#[derive(Debug, Serialize)]
pub struct EmailContent<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub sender_name: &'a str,
    pub sender_email: &'a str,
}

pub fn render_email(content: &EmailContent<'_>) -> AppResult<String> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string("email", EMAIL_TEMPLATE)
        .map_err(|e| AppError::Internal(format!("Invalid email template: {}", e)))?;
    registry
        .render("email", content)
        .map_err(|e| AppError::Internal(format!("Failed to render email: {}", e)))
}

/// STARTTLS SMTP relay authenticated as `EMAIL_USER`, who is also the sender.
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(user: &str, password: &str, host: &str) -> Result<Self, String> {
        let from: Mailbox = user.parse().map_err(|e| format!("Invalid EMAIL_USER: {}", e))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| format!("Invalid SMTP host {}: {}", host, e))?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("Invalid recipient {}: {}", to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send failed: {}", e)))?;
        Ok(())
    }
}

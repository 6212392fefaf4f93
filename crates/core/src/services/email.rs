//! Outgoing email delivery.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use lingkod_common::{AppError, AppResult, config::EmailSettings};

/// Email service backed by SMTP.
///
/// When no SMTP settings are configured the service degrades to logging the
/// message instead of sending it, which keeps local development working
/// without a mail server.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl EmailService {
    /// Build an email service from optional SMTP settings.
    pub fn new(settings: Option<&EmailSettings>) -> AppResult<Self> {
        let Some(settings) = settings else {
            return Ok(Self {
                transport: None,
                from: None,
            });
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::Email(format!("Invalid SMTP host: {e}")))?
            .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", settings.from_name, settings.from_address)
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: Some(builder.build()),
            from: Some(from),
        })
    }

    /// Whether a real SMTP transport is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a plain-text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            tracing::debug!(to = %to, subject = %subject, body = %body, "Email transport not configured, logging message instead");
            return Ok(());
        };

        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Email(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("Failed to send email: {e}")))?;

        Ok(())
    }

    /// Send a one-time verification code.
    pub async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        ttl_minutes: i64,
    ) -> AppResult<()> {
        let subject = "Your verification code";
        let body = format!(
            "Your verification code is: {code}\n\n\
             The code expires in {ttl_minutes} minutes. If you did not request it, you can ignore this message.",
        );
        self.send(to, subject, &body).await
    }
}

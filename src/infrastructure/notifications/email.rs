use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::config::EmailConfig;
use crate::domain::entities::AlertProposal;
use crate::domain::ports::notifier::{NotificationError, Notifier};

/// Sends alerts as plain-text email over SMTP with STARTTLS.
///
/// Credentials are optional so a local relay on port 25 works without
/// authentication.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
}

impl EmailNotifier {
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the SMTP relay
    /// cannot be configured or an address does not parse.
    pub fn new(config: &EmailConfig) -> Result<Self, NotificationError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| {
                    NotificationError::ChannelUnavailable(format!("smtp relay: {e}"))
                })?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.parse().map_err(|e| {
                NotificationError::ChannelUnavailable(format!("from address: {e}"))
            })?)
            .to(self.to.parse().map_err(|e| {
                NotificationError::ChannelUnavailable(format!("to address: {e}"))
            })?)
            .subject(format!("[{}] {}", alert.severity, alert.title))
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| NotificationError::SendFailed(format!("build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("smtp: {e}")))?;
        Ok(())
    }
}

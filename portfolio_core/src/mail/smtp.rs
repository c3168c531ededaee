use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::info;
use crate::config::MailConfig;
use crate::mail::{ContactNotification, MailError, Mailer};
use crate::models::NewMessage;

/// Sends contact notifications through the configured SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport once; connections are opened lazily per send.
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let sender = config
            .sender()
            .ok_or_else(|| MailError::Build("no sender address configured".to_string()))?;
        let recipient = config
            .recipient
            .as_deref()
            .ok_or_else(|| MailError::Build("no recipient address configured".to_string()))?;

        let builder = if config.use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)?
        } else if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: sender.parse()?,
            to: recipient.parse()?,
        })
    }

    pub fn build_message(&self, notification: &ContactNotification) -> Result<Message, MailError> {
        build_message(&self.from, &self.to, notification)
    }
}

fn build_message(
    from: &Mailbox,
    to: &Mailbox,
    notification: &ContactNotification,
) -> Result<Message, MailError> {
    Message::builder()
        .from(from.clone())
        .reply_to(notification.reply_to.parse()?)
        .to(to.clone())
        .subject(notification.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact_notification(&self, message: &NewMessage) -> Result<(), MailError> {
        let notification = ContactNotification::new(message);
        let email = self.build_message(&notification)?;

        self.transport.send(email).await?;

        info!(to = %self.to, reply_to = %notification.reply_to, "Contact notification email sent");
        Ok(())
    }
}

//! Outbound notification for contact submissions.
//!
//! [`Mailer`] is the seam the intake service depends on; [`SmtpMailer`] is
//! the production implementation over lettre's async SMTP transport.

pub mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;
use crate::models::NewMessage;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender, recipient or reply-to address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one notification for a stored submission. Single attempt.
    async fn send_contact_notification(&self, message: &NewMessage) -> Result<(), MailError>;
}

/// Subject and body of the email sent for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotification {
    pub subject: String,
    pub body: String,
    /// The submitter's address, used as `Reply-To`.
    pub reply_to: String,
}

impl ContactNotification {
    pub fn new(message: &NewMessage) -> Self {
        Self {
            subject: format!("New Contact Form Message from {}", message.name),
            body: format!(
                "You have received a new message from your portfolio contact form.\n\n\
                 Name: {}\n\
                 Email: {}\n\n\
                 Message:\n{}\n",
                message.name, message.email, message.message
            ),
            reply_to: message.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_templates() {
        let notification = ContactNotification::new(&NewMessage {
            name: "Alice".to_string(),
            email: "a@example.com".to_string(),
            message: "Hello there".to_string(),
        });

        assert_eq!(notification.subject, "New Contact Form Message from Alice");
        assert_eq!(notification.reply_to, "a@example.com");
        assert!(notification.body.contains("Name: Alice\n"));
        assert!(notification.body.contains("Email: a@example.com\n"));
        assert!(notification.body.ends_with("Message:\nHello there\n"));
    }

    #[test]
    fn email_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}

use std::sync::Arc;
use tracing::{error, info, warn};
use crate::{
    database::MessageStore,
    error::ContactError,
    mail::Mailer,
    models::{
        contact::{RECEIVED, RECEIVED_AND_EMAILED, SAVED_EMAIL_FAILED},
        ContactRequest, ContactResponse, Message,
    },
};

/// Validation, persistence and notification of contact submissions.
#[derive(Clone)]
pub struct ContactService {
    messages: Arc<dyn MessageStore>,
    mailer: Option<Arc<dyn Mailer>>,
}

/// What happened to a submission that was stored successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Stored; mail is disabled.
    Saved(Message),
    /// Stored and the notification was accepted by the relay.
    Emailed(Message),
    /// Stored, but the notification failed. Soft failure.
    EmailFailed { message: Message, error: String },
}

impl ContactOutcome {
    pub fn message(&self) -> &Message {
        match self {
            ContactOutcome::Saved(message)
            | ContactOutcome::Emailed(message)
            | ContactOutcome::EmailFailed { message, .. } => message,
        }
    }

    pub fn to_response(&self) -> ContactResponse {
        match self {
            ContactOutcome::Saved(_) => ContactResponse::success(RECEIVED),
            ContactOutcome::Emailed(_) => ContactResponse::success(RECEIVED_AND_EMAILED),
            ContactOutcome::EmailFailed { error, .. } => {
                ContactResponse::success(SAVED_EMAIL_FAILED).with_error(error.clone())
            }
        }
    }
}

impl ContactService {
    pub fn new(messages: Arc<dyn MessageStore>) -> Self {
        Self {
            messages,
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn is_mail_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn submit(&self, request: ContactRequest) -> Result<ContactOutcome, ContactError> {
        let new_message = request.into_new_message().ok_or_else(|| {
            warn!("Rejected contact submission with missing fields");
            ContactError::MissingFields
        })?;

        info!(name = %new_message.name, email = %new_message.email, "New contact submission");

        let message = self.messages.save_message(&new_message).await.map_err(|e| {
            error!("Failed to save contact message: {}", e);
            ContactError::Persistence(e)
        })?;

        let Some(mailer) = &self.mailer else {
            return Ok(ContactOutcome::Saved(message));
        };

        match mailer.send_contact_notification(&new_message).await {
            Ok(()) => Ok(ContactOutcome::Emailed(message)),
            Err(e) => {
                error!(message_id = message.id, "Failed to send contact notification: {}", e);
                Ok(ContactOutcome::EmailFailed {
                    message,
                    error: e.to_string(),
                })
            }
        }
    }
}

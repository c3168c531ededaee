//! Contact form payloads, stored messages and the response envelope

use serde::{Deserialize, Deserializer, Serialize};

pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const INVALID_PAYLOAD: &str = "Invalid JSON payload.";
pub const SAVE_FAILED: &str = "Could not save message due to a database error.";
pub const RECEIVED: &str = "Message received!";
pub const RECEIVED_AND_EMAILED: &str = "Message received and emailed!";
pub const SAVED_EMAIL_FAILED: &str = "Message saved, but failed to send email notification.";

/// Raw `POST /api/contact` body. A field that is absent, `null` or not a
/// string deserializes to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl ContactRequest {
    /// Trims every field and returns `None` unless all three are non-blank.
    pub fn into_new_message(self) -> Option<NewMessage> {
        fn required(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Some(NewMessage {
            name: required(self.name)?,
            email: required(self.email)?,
            message: required(self.message)?,
        })
    }
}

/// A validated, trimmed submission ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ContactRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_payload_is_trimmed() {
        let message = parse(json!({
            "name": "  Alice ",
            "email": "a@example.com\n",
            "message": "\tHello"
        }))
        .into_new_message()
        .unwrap();

        assert_eq!(message.name, "Alice");
        assert_eq!(message.email, "a@example.com");
        assert_eq!(message.message, "Hello");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let request = parse(json!({"name": "Alice", "email": "a@example.com"}));
        assert!(request.into_new_message().is_none());
    }

    #[test]
    fn test_blank_value_is_rejected() {
        let request = parse(json!({"name": "   ", "email": "a@example.com", "message": "Hello"}));
        assert!(request.into_new_message().is_none());

        let request = parse(json!({"name": "", "email": "a@example.com", "message": "Hello"}));
        assert!(request.into_new_message().is_none());
    }

    #[test]
    fn test_null_and_non_string_values_count_as_missing() {
        let request = parse(json!({"name": null, "email": "a@example.com", "message": "Hello"}));
        assert!(request.name.is_none());
        assert!(request.into_new_message().is_none());

        let request = parse(json!({"name": "Alice", "email": 42, "message": "Hello"}));
        assert!(request.email.is_none());
        assert!(request.into_new_message().is_none());
    }

    #[test]
    fn test_email_format_is_not_checked() {
        let message = parse(json!({"name": "Bob", "email": "not-an-email", "message": "Hi"}))
            .into_new_message()
            .unwrap();
        assert_eq!(message.email, "not-an-email");
    }

    #[test]
    fn test_response_omits_absent_error() {
        let body = serde_json::to_value(ContactResponse::success(RECEIVED_AND_EMAILED)).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Message received and emailed!"}));

        let body = serde_json::to_value(
            ContactResponse::success(SAVED_EMAIL_FAILED).with_error("connection refused"),
        )
        .unwrap();
        assert_eq!(body["error"], "connection refused");
        assert_eq!(body["message"], SAVED_EMAIL_FAILED);
    }
}

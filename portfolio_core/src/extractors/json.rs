//! JSON extractor whose rejections speak the contact envelope

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use crate::error::ContactError;

/// Like [`Json`], but only a JSON object is accepted. A missing content
/// type, malformed body or any other JSON value is rejected with
/// [`ContactError::InvalidPayload`] instead of axum's plain-text rejections.
pub struct ContactJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ContactJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ContactError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => value,
            Err(rejection) => {
                let reason = describe(&rejection);
                warn!(reason = %reason, "Rejected contact payload: {}", rejection.body_text());
                return Err(ContactError::InvalidPayload(reason.to_string()));
            }
        };

        // Derived struct impls also accept arrays, matching fields by position.
        if !value.is_object() {
            warn!("Rejected contact payload: body is not a JSON object");
            return Err(ContactError::InvalidPayload("expected a JSON object".to_string()));
        }

        serde_json::from_value(value).map(ContactJson).map_err(|err| {
            warn!(error = %err, "Rejected contact payload: unexpected JSON shape");
            ContactError::InvalidPayload("unexpected JSON shape".to_string())
        })
    }
}

fn describe(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "missing JSON content type",
        JsonRejection::JsonSyntaxError(_) => "malformed JSON",
        JsonRejection::JsonDataError(_) => "unexpected JSON shape",
        JsonRejection::BytesRejection(_) => "unreadable body",
        _ => "invalid JSON request",
    }
}

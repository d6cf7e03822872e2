//! JSON extractor for platform events.
//!
//! A body that does not decode as a skill event never reaches the router; it
//! is answered with a structured `AppError::Validation` naming the offending
//! field where serde reports one.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| AppJson(value))
            .map_err(reject)
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    AppError::Validation {
        field: Some(field_from_serde_message(&body_text).unwrap_or_else(|| "body".to_string())),
        message: format!("Event body could not be decoded: {body_text}"),
        received: None,
        docs_hint: Some(
            "POST the platform event envelope (session + request) as JSON; see /api-doc/openapi.json."
                .to_string(),
        ),
    }
}

/// Pull the field name out of serde messages like "missing field `session`"
/// or "unknown variant `CanFulfillIntentRequest`".
fn field_from_serde_message(msg: &str) -> Option<String> {
    ["missing field `", "unknown field `", "unknown variant `"]
        .iter()
        .find_map(|marker| {
            let start = msg.find(marker)? + marker.len();
            let rest = &msg[start..];
            rest.find('`').map(|end| rest[..end].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_missing_field() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `session` at line 1 column 40";
        assert_eq!(field_from_serde_message(msg), Some("session".to_string()));
    }

    #[test]
    fn names_unknown_request_type() {
        let msg = "request: unknown variant `CanFulfillIntentRequest`, expected one of `LaunchRequest`, `IntentRequest`";
        assert_eq!(
            field_from_serde_message(msg),
            Some("CanFulfillIntentRequest".to_string())
        );
    }

    #[test]
    fn generic_errors_have_no_field() {
        assert_eq!(
            field_from_serde_message("expected value at line 1 column 1"),
            None
        );
    }
}

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use garden_core::error::{self, ApiError};
use garden_core::response::{ResponseEnvelope, ResponsePayload, build_response};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::speech;

/// Failures that stop a turn. Unrecognised slots and missing records are not
/// errors; handlers answer those with a clarifying sentence.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("application id '{received}' does not match the configured skill")]
    AuthorizationMismatch { received: String },
    #[error("unknown intent '{0}'")]
    UnknownIntent(String),
    #[error(transparent)]
    Remote(#[from] GatewayError),
}

impl SkillError {
    /// Status and envelope to send back for a failed turn. Every failure still
    /// answers with a valid envelope so the device never waits on a dead turn.
    /// Apologies echo `attributes`; a refused caller gets none of them back.
    pub fn into_reply(
        self,
        reprompt: &str,
        attributes: Map<String, Value>,
    ) -> (StatusCode, ResponseEnvelope) {
        match self {
            SkillError::AuthorizationMismatch { received } => {
                tracing::warn!(application_id = %received, "refused event for another skill");
                (StatusCode::FORBIDDEN, ResponseEnvelope::minimal())
            }
            SkillError::UnknownIntent(name) => {
                tracing::error!(intent = %name, "no handler for intent");
                (StatusCode::OK, apology(speech::UNSUPPORTED_INTENT, reprompt, attributes))
            }
            SkillError::Remote(err) => {
                tracing::error!(error = %err, "remote data call failed");
                (StatusCode::OK, apology(speech::REMOTE_FAILURE, reprompt, attributes))
            }
        }
    }
}

fn apology(speech: &str, reprompt: &str, attributes: Map<String, Value>) -> ResponseEnvelope {
    build_response(
        attributes,
        ResponsePayload::ask(speech, reprompt).into_speechlet(),
    )
}

/// Request-level error that converts to a structured JSON body
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => {
                tracing::warn!(%request_id, %message, "rejected malformed request");
                (
                    StatusCode::BAD_REQUEST,
                    ApiError {
                        error: error::codes::VALIDATION_FAILED.to_string(),
                        message,
                        field,
                        received,
                        request_id,
                        docs_hint,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

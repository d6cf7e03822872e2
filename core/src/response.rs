//! Outbound response envelope and the pure functions that assemble it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const ENVELOPE_VERSION: &str = "1.0";

/// Top-level reply to the voice platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    /// Echoed back by the platform on the next turn of the session
    #[schema(value_type = Object)]
    pub session_attributes: Map<String, Value>,
    pub response: SpeechletResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutputSpeech {
    /// Always "PlainText"
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Card {
    /// Always "Simple"
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// What a handler wants said, before it is shaped into the platform format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    pub speech_text: String,
    pub reprompt_text: String,
    /// A companion-app card is shown only when a title is set
    pub card_title: Option<String>,
    pub should_end_session: bool,
}

impl ResponsePayload {
    /// Spoken reply that keeps the session open.
    pub fn ask(speech_text: impl Into<String>, reprompt_text: impl Into<String>) -> Self {
        Self {
            speech_text: speech_text.into(),
            reprompt_text: reprompt_text.into(),
            card_title: None,
            should_end_session: false,
        }
    }

    /// Empty reply that closes the session.
    pub fn end() -> Self {
        Self {
            speech_text: String::new(),
            reprompt_text: String::new(),
            card_title: None,
            should_end_session: true,
        }
    }

    pub fn with_card(mut self, title: impl Into<String>) -> Self {
        self.card_title = Some(title.into());
        self
    }

    pub fn into_speechlet(self) -> SpeechletResponse {
        match self.card_title {
            Some(title) => build_speechlet_response_with_card(
                &title,
                &self.speech_text,
                &self.reprompt_text,
                self.should_end_session,
            ),
            None => build_speechlet_response_without_card(
                &self.speech_text,
                &self.reprompt_text,
                self.should_end_session,
            ),
        }
    }
}

fn plain_text(text: &str) -> OutputSpeech {
    OutputSpeech {
        kind: "PlainText".to_string(),
        text: text.to_string(),
    }
}

pub fn build_response(
    session_attributes: Map<String, Value>,
    speechlet: SpeechletResponse,
) -> ResponseEnvelope {
    ResponseEnvelope {
        version: ENVELOPE_VERSION.to_string(),
        session_attributes,
        response: speechlet,
    }
}

pub fn build_speechlet_response_with_card(
    title: &str,
    text: &str,
    reprompt: &str,
    should_end_session: bool,
) -> SpeechletResponse {
    SpeechletResponse {
        card: Some(Card {
            kind: "Simple".to_string(),
            title: title.to_string(),
            content: text.to_string(),
        }),
        ..build_speechlet_response_without_card(text, reprompt, should_end_session)
    }
}

pub fn build_speechlet_response_without_card(
    text: &str,
    reprompt: &str,
    should_end_session: bool,
) -> SpeechletResponse {
    SpeechletResponse {
        output_speech: Some(plain_text(text)),
        card: None,
        reprompt: Some(Reprompt {
            output_speech: plain_text(reprompt),
        }),
        should_end_session,
    }
}

impl ResponseEnvelope {
    /// Smallest valid reply: no speech, session closed. Used to acknowledge
    /// session-ended notifications and to answer refused turns.
    pub fn minimal() -> Self {
        build_response(
            Map::new(),
            SpeechletResponse {
                output_speech: None,
                card: None,
                reprompt: None,
                should_end_session: true,
            },
        )
    }

    pub fn speech_text(&self) -> Option<&str> {
        self.response
            .output_speech
            .as_ref()
            .map(|speech| speech.text.as_str())
    }
}

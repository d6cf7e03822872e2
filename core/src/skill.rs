//! Inbound voice-platform event.
//!
//! Only the parts of the envelope the skill reads are modelled; anything else
//! the platform sends (device context, locale, timestamps) is ignored on
//! deserialization.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A single platform call: who is asking and what they asked for.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillEvent {
    pub session: Session,
    pub request: SkillRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub application: Application,
    /// True on the first turn of a conversation
    #[serde(default)]
    pub new: bool,
    pub user: User,
    /// Attributes the platform echoes back from the previous turn
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum SkillRequest {
    /// Skill opened without a specific question
    #[serde(rename = "LaunchRequest")]
    Launch(RequestInfo),
    #[serde(rename = "IntentRequest")]
    Intent(IntentRequest),
    /// Platform closed the session (user silence, error, or explicit exit)
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded(SessionEndedRequest),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A parsed utterance: intent name plus the named entities it carried.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw spoken value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Entity resolution results, present for custom slot types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Resolutions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default)]
    pub resolutions_per_authority: Vec<ResolutionAuthority>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ResolutionAuthority {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    /// Absent when the spoken term matched no known entity
    #[serde(default)]
    pub values: Vec<ResolutionValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolutionValue {
    pub value: ResolvedEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedEntity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Outcome of looking up a named entity in an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResolution {
    /// The canonical entity name the platform matched
    Resolved(String),
    /// Slot missing, or the spoken term matched no known entity
    Unresolved,
}

impl Intent {
    /// Canonical entity name for a custom slot, taken from the first
    /// resolution authority that produced a match.
    pub fn resolve_slot(&self, slot_name: &str) -> SlotResolution {
        let Some(slot) = self.slots.get(slot_name) else {
            return SlotResolution::Unresolved;
        };
        slot.resolutions
            .iter()
            .flat_map(|resolutions| resolutions.resolutions_per_authority.iter())
            .find_map(|authority| authority.values.first())
            .map(|value| value.value.name.trim())
            .filter(|name| !name.is_empty())
            .map_or(SlotResolution::Unresolved, |name| {
                SlotResolution::Resolved(name.to_string())
            })
    }

    /// Raw spoken value of a slot, for built-in slot types without
    /// entity resolution.
    pub fn slot_value(&self, slot_name: &str) -> Option<&str> {
        self.slots
            .get(slot_name)?
            .value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Key identifying a user's records in the plant service.
///
/// Platform user ids look like `amzn1.ask.account.<opaque>`; the plant service
/// is keyed on the opaque fourth component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey(String);

impl UserKey {
    pub fn derive(user_id: &str) -> Self {
        let trimmed = user_id.trim();
        match trimmed.split('.').nth(3) {
            Some(component) if !component.is_empty() => Self(component.to_string()),
            _ => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

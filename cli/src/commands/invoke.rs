use std::collections::HashMap;

use clap::Args;
use garden_core::skill::{
    Application, Intent, IntentRequest, RequestInfo, ResolutionAuthority, ResolutionValue,
    Resolutions, ResolvedEntity, Session, SkillEvent, SkillRequest, Slot, User,
};
use serde_json::Map;
use uuid::Uuid;

use crate::util::{api_request, exit_error};

pub const DEFAULT_USER_ID: &str = "amzn1.ask.account.GARDENCLI";

const CLI_AUTHORITY: &str = "amzn1.er-authority.echo-sdk.garden-cli";

#[derive(Args)]
pub struct AskArgs {
    /// Intent name as the platform sends it (e.g. PlantQueryIntent, AMAZON.HelpIntent)
    pub intent: String,

    /// Entity slot that resolved to a catalogue value (repeatable: name=value)
    #[arg(long, value_parser = parse_assignment)]
    pub slot: Vec<(String, String)>,

    /// Slot carrying only the spoken value, like built-in month slots (repeatable: name=value)
    #[arg(long, value_parser = parse_assignment)]
    pub raw_slot: Vec<(String, String)>,

    /// Mark the event as the first turn of a new session
    #[arg(long)]
    pub new_session: bool,
}

/// Where to send events and who they claim to come from.
pub struct Target {
    pub api_url: String,
    pub skill_id: String,
    pub user_id: String,
}

impl Target {
    pub fn new(api_url: &str, skill_id: Option<String>, user_id: &str) -> Self {
        let skill_id = skill_id.unwrap_or_else(|| {
            exit_error(
                "skill_id is required to build platform events",
                Some("Set --skill-id or GARDEN_SKILL_ID to the id the service is configured with"),
            )
        });
        Self {
            api_url: api_url.to_string(),
            skill_id,
            user_id: user_id.to_string(),
        }
    }
}

pub async fn launch(target: &Target) -> i32 {
    let request = SkillRequest::Launch(RequestInfo {
        request_id: Some(request_id()),
    });
    send(target, event(target, true, request)).await
}

pub async fn ask(target: &Target, args: AskArgs) -> i32 {
    let request = SkillRequest::Intent(IntentRequest {
        request_id: Some(request_id()),
        intent: build_intent(&args.intent, &args.slot, &args.raw_slot),
    });
    send(target, event(target, args.new_session, request)).await
}

async fn send(target: &Target, event: SkillEvent) -> i32 {
    let body = match serde_json::to_value(&event) {
        Ok(body) => body,
        Err(e) => exit_error(&format!("Could not encode event: {e}"), None),
    };
    api_request(&target.api_url, reqwest::Method::POST, "/v1/skill", Some(body)).await
}

fn request_id() -> String {
    format!("amzn1.echo-api.request.{}", Uuid::now_v7())
}

fn event(target: &Target, new: bool, request: SkillRequest) -> SkillEvent {
    SkillEvent {
        session: Session {
            session_id: Some(format!("amzn1.echo-api.session.{}", Uuid::now_v7())),
            application: Application {
                application_id: target.skill_id.clone(),
            },
            new,
            user: User {
                user_id: target.user_id.clone(),
            },
            attributes: Map::new(),
        },
        request,
    }
}

/// Parse a `name=value` argument. The value may itself contain `=`.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

fn build_intent(name: &str, resolved: &[(String, String)], raw: &[(String, String)]) -> Intent {
    let mut slots = HashMap::new();

    for (slot_name, value) in raw {
        slots.insert(
            slot_name.clone(),
            Slot {
                name: Some(slot_name.clone()),
                value: Some(value.clone()),
                resolutions: None,
            },
        );
    }

    // Resolved slots win over raw ones with the same name.
    for (slot_name, value) in resolved {
        slots.insert(
            slot_name.clone(),
            Slot {
                name: Some(slot_name.clone()),
                value: Some(value.to_lowercase()),
                resolutions: Some(Resolutions {
                    resolutions_per_authority: vec![ResolutionAuthority {
                        authority: Some(CLI_AUTHORITY.to_string()),
                        values: vec![ResolutionValue {
                            value: ResolvedEntity {
                                name: value.clone(),
                                id: None,
                            },
                        }],
                    }],
                }),
            },
        );
    }

    Intent {
        name: name.to_string(),
        slots,
    }
}

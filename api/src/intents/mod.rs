//! Intent Router: checks the caller, decides what kind of request arrived,
//! and hands it to exactly one handler.

use std::str::FromStr;

use chrono::DateTime;
use chrono_tz::Tz;
use garden_core::response::{ResponseEnvelope, ResponsePayload, build_response};
use garden_core::skill::{Intent, SkillEvent, SkillRequest, UserKey};
use serde_json::{Map, Value};

use crate::config::SkillConfig;
use crate::error::SkillError;
use crate::gateway::{GatewayError, PlantGateway};

mod calendar;
mod garden;
mod plant_data;
mod session;
mod weather;

/// Every intent the skill answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Help,
    Fallback,
    Cancel,
    Stop,
    PlantQuery,
    MonthQuery,
    Weather,
    Remember,
    Forget,
    Recall,
    PlantData,
}

impl IntentKind {
    pub const ALL: [IntentKind; 11] = [
        Self::Help,
        Self::Fallback,
        Self::Cancel,
        Self::Stop,
        Self::PlantQuery,
        Self::MonthQuery,
        Self::Weather,
        Self::Remember,
        Self::Forget,
        Self::Recall,
        Self::PlantData,
    ];

    /// Name the platform uses in `request.intent.name`.
    pub fn platform_name(self) -> &'static str {
        match self {
            Self::Help => "AMAZON.HelpIntent",
            Self::Fallback => "AMAZON.FallbackIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::PlantQuery => "PlantQueryIntent",
            Self::MonthQuery => "MonthQueryIntent",
            Self::Weather => "WeatherIntent",
            Self::Remember => "RememberIntent",
            Self::Forget => "ForgetIntent",
            Self::Recall => "RecallIntent",
            Self::PlantData => "PlantDataIntent",
        }
    }
}

impl FromStr for IntentKind {
    type Err = SkillError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.platform_name() == name)
            .ok_or_else(|| SkillError::UnknownIntent(name.to_string()))
    }
}

/// Everything a handler may read while answering one request.
pub struct Turn<'a> {
    /// Session attributes as received; echoed back unless a handler replaces them
    pub attributes: Map<String, Value>,
    pub user_key: UserKey,
    pub config: &'a SkillConfig,
    pub gateway: &'a dyn PlantGateway,
    /// Request time in the configured timezone
    pub now: DateTime<Tz>,
}

impl Turn<'_> {
    pub fn reprompt(&self) -> &str {
        &self.config.reprompt_text
    }

    /// Spoken answer that keeps the session open, with the standard reprompt.
    pub fn ask(&self, speech: impl Into<String>) -> ResponseEnvelope {
        self.reply(ResponsePayload::ask(speech, self.reprompt()))
    }

    pub fn reply(&self, payload: ResponsePayload) -> ResponseEnvelope {
        build_response(self.attributes.clone(), payload.into_speechlet())
    }
}

/// Answer one platform event.
///
/// Refuses events for other skills before anything else runs. Remote failures
/// and unknown intents come back as errors so the caller decides how to
/// phrase them.
pub async fn handle_event(
    config: &SkillConfig,
    gateway: &dyn PlantGateway,
    event: SkillEvent,
    now: DateTime<Tz>,
) -> Result<ResponseEnvelope, SkillError> {
    let SkillEvent { session, request } = event;

    if session.application.application_id != config.skill_id {
        return Err(SkillError::AuthorizationMismatch {
            received: session.application.application_id,
        });
    }

    let user_key = UserKey::derive(&session.user.user_id);
    if session.new {
        tracing::info!(
            user_key = %user_key,
            session_id = session.session_id.as_deref().unwrap_or(""),
            "session started"
        );
    }

    let turn = Turn {
        attributes: session.attributes,
        user_key,
        config,
        gateway,
        now,
    };

    match request {
        SkillRequest::Launch(_) => Ok(session::welcome(&turn)),
        SkillRequest::Intent(request) => {
            let kind = request.intent.name.parse::<IntentKind>()?;
            tracing::debug!(intent = kind.platform_name(), user_key = %turn.user_key, "dispatching intent");
            Ok(dispatch(kind, &request.intent, &turn).await?)
        }
        SkillRequest::SessionEnded(ended) => {
            tracing::info!(
                user_key = %turn.user_key,
                reason = ended.reason.as_deref().unwrap_or("unspecified"),
                "session ended"
            );
            Ok(ResponseEnvelope::minimal())
        }
    }
}

async fn dispatch(
    kind: IntentKind,
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    match kind {
        IntentKind::Help => Ok(session::help(turn)),
        IntentKind::Fallback => Ok(session::fallback(turn)),
        IntentKind::Cancel | IntentKind::Stop => Ok(session::goodbye(turn)),
        IntentKind::PlantQuery => calendar::plant_query(intent, turn).await,
        IntentKind::MonthQuery => calendar::month_query(intent, turn).await,
        IntentKind::Weather => weather::weather_advice(turn).await,
        IntentKind::Remember => garden::remember(intent, turn).await,
        IntentKind::Forget => garden::forget(intent, turn).await,
        IntentKind::Recall => garden::recall(turn).await,
        IntentKind::PlantData => plant_data::plant_data(intent, turn).await,
    }
}

#[cfg(test)]
mod tests {
    use garden_core::skill::{IntentRequest, RequestInfo, SessionEndedRequest};
    use serde_json::json;

    use super::*;
    use crate::gateway::Endpoint;
    use crate::speech;
    use crate::testing::{StubGateway, TEST_SKILL_ID, at, event, intent, test_config};

    fn intent_event(name: &str) -> SkillEvent {
        event(
            TEST_SKILL_ID,
            SkillRequest::Intent(IntentRequest {
                request_id: None,
                intent: intent(name, &[]),
            }),
        )
    }

    #[test]
    fn every_kind_round_trips_through_its_platform_name() {
        for kind in IntentKind::ALL {
            assert_eq!(kind.platform_name().parse::<IntentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "AMAZON.ShuffleOnIntent"
            .parse::<IntentKind>()
            .expect_err("unknown intent");
        assert!(matches!(err, SkillError::UnknownIntent(name) if name == "AMAZON.ShuffleOnIntent"));
    }

    #[tokio::test]
    async fn mismatched_application_is_refused_before_dispatch() {
        let config = test_config();
        let gateway = StubGateway::new();
        let mut event = intent_event("RecallIntent");
        event.session.application.application_id = "amzn1.ask.skill.other".to_string();

        let err = handle_event(&config, &gateway, event, at(2021, 4, 25))
            .await
            .expect_err("foreign skill id must be refused");

        assert!(matches!(
            err,
            SkillError::AuthorizationMismatch { received } if received == "amzn1.ask.skill.other"
        ));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_intent_is_an_error() {
        let config = test_config();
        let gateway = StubGateway::new();
        let err = handle_event(
            &config,
            &gateway,
            intent_event("OrderPizzaIntent"),
            at(2021, 4, 25),
        )
        .await
        .expect_err("unknown intent");
        assert!(matches!(err, SkillError::UnknownIntent(_)));
    }

    #[tokio::test]
    async fn launch_greets_with_card_and_records_attributes() {
        let config = test_config();
        let gateway = StubGateway::new();
        let envelope = handle_event(
            &config,
            &gateway,
            event(TEST_SKILL_ID, SkillRequest::Launch(RequestInfo::default())),
            at(2021, 4, 25),
        )
        .await
        .expect("launch succeeds");

        assert_eq!(envelope.speech_text(), Some(speech::WELCOME));
        assert!(!envelope.response.should_end_session);
        assert_eq!(
            envelope.response.card.as_ref().map(|card| card.title.as_str()),
            Some(speech::CARD_TITLE)
        );
        assert_eq!(envelope.session_attributes["speechOutput"], json!(speech::WELCOME));
        assert_eq!(
            envelope.session_attributes["repromptText"],
            json!(config.reprompt_text)
        );
    }

    #[tokio::test]
    async fn session_ended_gets_minimal_envelope() {
        let config = test_config();
        let gateway = StubGateway::new();
        let envelope = handle_event(
            &config,
            &gateway,
            event(
                TEST_SKILL_ID,
                SkillRequest::SessionEnded(SessionEndedRequest {
                    request_id: None,
                    reason: Some("USER_INITIATED".to_string()),
                }),
            ),
            at(2021, 4, 25),
        )
        .await
        .expect("session end succeeds");

        assert_eq!(envelope, ResponseEnvelope::minimal());
    }

    #[tokio::test]
    async fn session_attributes_are_echoed_back() {
        let config = test_config();
        let gateway = StubGateway::new();
        let mut event = intent_event("AMAZON.HelpIntent");
        event
            .session
            .attributes
            .insert("speechOutput".to_string(), json!("earlier"));

        let envelope = handle_event(&config, &gateway, event, at(2021, 4, 25))
            .await
            .expect("help succeeds");
        assert_eq!(envelope.session_attributes["speechOutput"], json!("earlier"));
    }

    #[tokio::test]
    async fn remote_failure_surfaces_as_remote_error() {
        let config = test_config();
        let gateway = StubGateway::failing(503);
        let err = handle_event(
            &config,
            &gateway,
            intent_event("RecallIntent"),
            at(2021, 4, 25),
        )
        .await
        .expect_err("remote failure");
        assert!(matches!(
            err,
            SkillError::Remote(GatewayError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn intents_reach_their_handlers() {
        let config = test_config();
        let gateway = StubGateway::new().with(
            Endpoint::UserPlants(UserKey::derive(crate::testing::TEST_USER_ID)),
            json!([{ "plant": "Kale", "water": "Medium", "temp": "Hardy" }]),
        );
        let envelope = handle_event(
            &config,
            &gateway,
            intent_event("RecallIntent"),
            at(2021, 4, 25),
        )
        .await
        .expect("recall succeeds");

        assert_eq!(
            envelope.speech_text(),
            Some("Currently you only have Kale in your Virtual Garden.")
        );
    }
}

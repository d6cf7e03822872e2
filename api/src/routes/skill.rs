use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::post};
use chrono::Utc;
use garden_core::response::ResponseEnvelope;
use garden_core::skill::SkillEvent;

use crate::extract::AppJson;
use crate::intents;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/skill", post(handle_skill_event))
}

/// Answer one voice-platform event
///
/// Remote failures and unknown intents still answer 200 with a spoken apology.
/// Events addressed to another skill are refused with 403.
#[utoipa::path(
    post,
    path = "/v1/skill",
    request_body = SkillEvent,
    responses(
        (status = 200, description = "Response envelope for the platform", body = ResponseEnvelope),
        (status = 400, description = "Body is not a skill event", body = garden_core::error::ApiError),
        (status = 403, description = "Application id does not match this skill", body = ResponseEnvelope)
    ),
    tag = "skill"
)]
pub async fn handle_skill_event(
    State(state): State<AppState>,
    AppJson(event): AppJson<SkillEvent>,
) -> impl IntoResponse {
    let now = Utc::now().with_timezone(&state.config.timezone);
    let attributes = event.session.attributes.clone();

    match intents::handle_event(&state.config, state.gateway.as_ref(), event, now).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)),
        Err(err) => {
            let (status, envelope) = err.into_reply(&state.config.reprompt_text, attributes);
            (status, Json(envelope))
        }
    }
}

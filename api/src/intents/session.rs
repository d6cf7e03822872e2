use garden_core::response::{ResponseEnvelope, ResponsePayload, build_response};
use serde_json::{Map, Value};

use super::Turn;
use crate::speech::{CARD_TITLE, WELCOME};

pub(super) fn welcome(turn: &Turn<'_>) -> ResponseEnvelope {
    let mut attributes = Map::new();
    attributes.insert("speechOutput".to_string(), Value::from(WELCOME));
    attributes.insert("repromptText".to_string(), Value::from(turn.reprompt()));

    let payload = ResponsePayload::ask(WELCOME, turn.reprompt()).with_card(CARD_TITLE);
    build_response(attributes, payload.into_speechlet())
}

pub(super) fn help(turn: &Turn<'_>) -> ResponseEnvelope {
    turn.reply(ResponsePayload::ask(turn.reprompt(), turn.reprompt()).with_card(CARD_TITLE))
}

/// Utterances the platform could not map to any intent get the same guidance
/// as an explicit request for help.
pub(super) fn fallback(turn: &Turn<'_>) -> ResponseEnvelope {
    help(turn)
}

pub(super) fn goodbye(turn: &Turn<'_>) -> ResponseEnvelope {
    turn.reply(ResponsePayload::end())
}

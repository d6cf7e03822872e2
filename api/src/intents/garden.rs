//! The user's Virtual Garden: plants they have asked the skill to track.

use garden_core::response::ResponseEnvelope;
use garden_core::skill::{Intent, SlotResolution};

use super::Turn;
use crate::gateway::{self, GatewayError, WriteOutcome};
use crate::speech::{Listing, UNRECOGNISED_PLANT};

const EMPTY_GARDEN: &str = "I couldn't find any plants in your Virtual Garden. \
You can ask me to remember any plants that you are growing.";

pub(super) async fn remember(
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    let SlotResolution::Resolved(plant) = intent.resolve_slot("plant") else {
        tracing::info!(intent = %intent.name, "plant slot unresolved");
        return Ok(turn.ask(UNRECOGNISED_PLANT));
    };

    let outcome = gateway::remember_plant(turn.gateway, &turn.user_key, &plant).await?;
    tracing::info!(user_key = %turn.user_key, plant = %plant, ?outcome, "remember plant");

    let speech = match outcome {
        WriteOutcome::Applied => format!("I'll remember that you're growing {plant} in your garden."),
        WriteOutcome::Unchanged => format!("You've already added {plant} to your Virtual Garden."),
    };
    Ok(turn.ask(speech))
}

pub(super) async fn forget(
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    let SlotResolution::Resolved(plant) = intent.resolve_slot("plant") else {
        tracing::info!(intent = %intent.name, "plant slot unresolved");
        return Ok(turn.ask(UNRECOGNISED_PLANT));
    };

    let outcome = gateway::forget_plant(turn.gateway, &turn.user_key, &plant).await?;
    tracing::info!(user_key = %turn.user_key, plant = %plant, ?outcome, "forget plant");

    let speech = match outcome {
        WriteOutcome::Applied => format!("I've removed {plant} from your Virtual Garden."),
        WriteOutcome::Unchanged => format!(
            "I couldn't find {plant} in your Virtual Garden. \
             It has either been removed already, or was never added."
        ),
    };
    Ok(turn.ask(speech))
}

pub(super) async fn recall(turn: &Turn<'_>) -> Result<ResponseEnvelope, GatewayError> {
    let plants: Vec<String> = gateway::user_plants(turn.gateway, &turn.user_key)
        .await?
        .into_iter()
        .map(|entry| entry.plant)
        .collect();

    let speech = match Listing::of(&plants) {
        Listing::Empty => EMPTY_GARDEN.to_string(),
        Listing::Single(plant) => format!("Currently you only have {plant} in your Virtual Garden."),
        Listing::Many(list) => {
            format!("You've added the following plants to your Virtual Garden: {list}.")
        }
    };
    Ok(turn.ask(speech))
}

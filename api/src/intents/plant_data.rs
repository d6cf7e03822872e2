use garden_core::plants::{Hardiness, PlantProfile, WaterNeed};
use garden_core::response::ResponseEnvelope;
use garden_core::skill::{Intent, SlotResolution};

use super::Turn;
use crate::gateway::{self, GatewayError};
use crate::speech::{UNKNOWN_PLANT, UNRECOGNISED_PLANT};

fn water_clause(water: &WaterNeed) -> Option<&'static str> {
    match water {
        WaterNeed::High | WaterNeed::VeryHigh => {
            Some("need lots of water compared to most other plants to grow.")
        }
        WaterNeed::Medium => Some("need a normal amount of water to grow."),
        WaterNeed::Low | WaterNeed::VeryLow => {
            Some("don't need as much water as most other plants to grow properly.")
        }
        WaterNeed::Unrated(_) => None,
    }
}

fn hardiness_clause(temp: &Hardiness) -> Option<&'static str> {
    match temp {
        Hardiness::Hardy | Hardiness::VeryHardy => Some(
            "hardy plants that are more resistant to low temperatures than most plants, \
             though they are not impervious to frost, and care should still be taken in cold weather.",
        ),
        Hardiness::HalfHardy => {
            Some("not resistant to frost, so care should be taken whenever temperatures drop.")
        }
        Hardiness::Tender | Hardiness::VeryTender => Some(
            "tender plants which are very vulnerable to low temperatures, and close attention \
             should be paid to them in cold weather. Consider covering them, growing them indoors \
             or in a greenhouse if possible.",
        ),
        Hardiness::Unrated(_) => None,
    }
}

pub(super) fn describe_profile(profile: &PlantProfile) -> String {
    let mut speech = profile.plant.clone();
    if let Some(clause) = water_clause(&profile.water) {
        speech.push(' ');
        speech.push_str(clause);
    }
    if let Some(clause) = hardiness_clause(&profile.temp) {
        speech.push_str(" Also, they are ");
        speech.push_str(clause);
    }
    speech
}

pub(super) async fn plant_data(
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    let SlotResolution::Resolved(plant) = intent.resolve_slot("plant") else {
        tracing::info!(intent = %intent.name, "plant slot unresolved");
        return Ok(turn.ask(UNRECOGNISED_PLANT));
    };

    let speech = match gateway::plant_profile(turn.gateway, &plant).await? {
        Some(profile) => describe_profile(&profile),
        None => {
            tracing::info!(plant = %plant, "no profile for plant");
            UNKNOWN_PLANT.to_string()
        }
    };
    Ok(turn.ask(speech))
}

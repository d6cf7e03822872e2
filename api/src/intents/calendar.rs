use chrono::Month;
use garden_core::calendar::{month_name, month_of, next_month, parse_month};
use garden_core::plants::PlantingCalendar;
use garden_core::response::ResponseEnvelope;
use garden_core::skill::{Intent, SlotResolution};

use super::Turn;
use crate::gateway::{self, GatewayError};
use crate::speech::{Listing, UNKNOWN_PLANT, UNRECOGNISED_MONTH, UNRECOGNISED_PLANT};

const NO_PLANTS_FOR_MONTH: &str = "Sorry, there are no plants suitable to start growing in that month. \
Most plants can be grown from March onwards, ending in August.";

/// Which month a month query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TargetMonth {
    Month(Month),
    /// The user named something that is not a month
    Unrecognised(String),
}

/// An explicit `month` slot wins; otherwise `relativeMonth` == "next" means
/// the month after `current`, and anything else means `current`.
pub(super) fn target_month(intent: &Intent, current: Month) -> TargetMonth {
    if let Some(spoken) = intent.slot_value("month") {
        return match parse_month(spoken) {
            Some(month) => TargetMonth::Month(month),
            None => TargetMonth::Unrecognised(spoken.to_string()),
        };
    }

    let relative = intent.slot_value("relativeMonth").map(str::to_lowercase);
    match relative.as_deref() {
        Some("next") => TargetMonth::Month(next_month(current)),
        _ => TargetMonth::Month(current),
    }
}

pub(super) fn describe_calendar(calendar: &PlantingCalendar) -> String {
    let outdoor = format!(
        "from {} to {}",
        month_name(calendar.outdoor_start),
        month_name(calendar.outdoor_end)
    );
    let harvest = format!(
        "will be ready for harvest between {} and {}",
        month_name(calendar.harvest_start),
        month_name(calendar.harvest_end)
    );

    match calendar.indoor {
        None => format!(
            "{} should be planted outdoors {outdoor}, and {harvest}.",
            calendar.plant
        ),
        Some((indoor_start, indoor_end)) => format!(
            "{} should be planted indoors or under cover from {} to {}, transferred outside {outdoor}, and {harvest}.",
            calendar.plant,
            month_name(indoor_start),
            month_name(indoor_end)
        ),
    }
}

pub(super) async fn plant_query(
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    let SlotResolution::Resolved(plant) = intent.resolve_slot("plant") else {
        tracing::info!(intent = %intent.name, "plant slot unresolved");
        return Ok(turn.ask(UNRECOGNISED_PLANT));
    };

    let speech = match gateway::planting_calendar(turn.gateway, &plant).await? {
        Some(calendar) => describe_calendar(&calendar),
        None => {
            tracing::info!(plant = %plant, "no planting calendar for plant");
            UNKNOWN_PLANT.to_string()
        }
    };
    Ok(turn.ask(speech))
}

pub(super) async fn month_query(
    intent: &Intent,
    turn: &Turn<'_>,
) -> Result<ResponseEnvelope, GatewayError> {
    let month = match target_month(intent, month_of(&turn.now)) {
        TargetMonth::Month(month) => month,
        TargetMonth::Unrecognised(spoken) => {
            tracing::info!(spoken = %spoken, "month slot not recognised");
            return Ok(turn.ask(UNRECOGNISED_MONTH));
        }
    };

    let plants = gateway::plants_for_month(turn.gateway, month).await?;
    let speech = match Listing::of(&plants) {
        Listing::Empty => NO_PLANTS_FOR_MONTH.to_string(),
        Listing::Single(list) | Listing::Many(list) => format!(
            "Here are some plants that you could start growing: {list}. \
             You can ask about any of these plants for more information."
        ),
    };
    Ok(turn.ask(speech))
}

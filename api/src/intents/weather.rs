use garden_core::plants::UserPlant;
use garden_core::response::ResponseEnvelope;
use garden_core::weather::WeatherSnapshot;

use super::Turn;
use crate::gateway::{self, GatewayError};
use crate::speech::Listing;

const SUITABLE_WEATHER: &str = "Recent weather seems to be suitable for your plants. \
Make sure you're giving them enough water, and that they're getting enough sunlight. \
In warmer weather, you may have to water them more, and as temperatures get colder \
you should watch out for frost damage on vulnerable plants.";

/// A user's plants grouped by the weather risks they are exposed to. One plant
/// can sit in a temperature group and a water group at the same time.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct PlantGroups {
    pub tender: Vec<String>,
    pub high_water: Vec<String>,
    pub low_water: Vec<String>,
}

pub(super) fn partition(plants: &[UserPlant]) -> PlantGroups {
    let mut groups = PlantGroups::default();
    for entry in plants {
        if entry.temp.is_tender() {
            groups.tender.push(entry.plant.clone());
        }
        if entry.water.is_high() {
            groups.high_water.push(entry.plant.clone());
        } else if entry.water.is_low() {
            groups.low_water.push(entry.plant.clone());
        }
    }
    groups
}

/// Rain and heat advice are exclusive (rain wins); the frost warning is
/// checked independently and always comes last.
pub(super) fn compose_advice(weather: &WeatherSnapshot, groups: &PlantGroups) -> String {
    let mut sentences: Vec<String> = Vec::new();
    let freezing = weather.is_freezing();

    if weather.is_raining() {
        sentences.push(
            "Due to the recent rain, make sure not to give your plants too much water.".to_string(),
        );
        match Listing::of(&groups.low_water) {
            Listing::Empty => {}
            Listing::Single(plant) => sentences.push(format!(
                "Your {plant} don't require much water, so be careful with them."
            )),
            Listing::Many(list) => sentences.push(format!(
                "Some of your plants don't require much water, these include your: {list}."
            )),
        }
    } else if weather.is_hot() {
        sentences.push(
            "Due to the recent high temperatures, consider watering your plants more than normal."
                .to_string(),
        );
        match Listing::of(&groups.high_water) {
            Listing::Empty => {}
            Listing::Single(plant) => sentences.push(format!(
                "Your {plant} need a lot of water, so make sure to give them enough."
            )),
            Listing::Many(list) => sentences.push(format!(
                "Some of your plants normally need a lot of water, these include your: {list} so be sure they are well watered."
            )),
        }
    }

    if freezing {
        let lead = if sentences.is_empty() {
            "Due to"
        } else {
            "Also, due to"
        };
        sentences.push(format!(
            "{lead} the recent low temperatures, consider sheltering your plants to prevent frost from damaging them."
        ));
        match Listing::of(&groups.tender) {
            Listing::Empty => {}
            Listing::Single(plant) => sentences.push(format!(
                "Your {plant} are vulnerable to the cold, so be sure to pay them close attention."
            )),
            Listing::Many(list) => sentences.push(format!(
                "Some of your plants are vulnerable to the cold, these include: {list} so be sure to pay them close attention."
            )),
        }
    }

    if sentences.is_empty() {
        SUITABLE_WEATHER.to_string()
    } else {
        sentences.join(" ")
    }
}

pub(super) async fn weather_advice(turn: &Turn<'_>) -> Result<ResponseEnvelope, GatewayError> {
    let (weather, plants) = tokio::try_join!(
        gateway::weather_forecast(turn.gateway, &turn.config.weather_location),
        gateway::user_plants(turn.gateway, &turn.user_key),
    )?;

    tracing::debug!(
        user_key = %turn.user_key,
        plants = plants.len(),
        raining = weather.is_raining(),
        hot = weather.is_hot(),
        freezing = weather.is_freezing(),
        "composing weather advice"
    );

    let groups = partition(&plants);
    Ok(turn.ask(compose_advice(&weather, &groups)))
}

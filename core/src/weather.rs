//! Current conditions and one-day forecast from the weather provider.

use serde::Deserialize;

/// Provider condition codes that indicate rain.
pub const RAIN_CONDITION_CODES: [u32; 7] = [1183, 1186, 1189, 1192, 1195, 1201, 1276];

/// Above this (°C) plants need more water than usual.
pub const HIGH_TEMP_C: f64 = 23.0;

/// Below this (°C) tender plants are at risk of frost.
pub const LOW_TEMP_C: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ForecastBody")]
pub struct WeatherSnapshot {
    pub current_temp_c: f64,
    pub current_condition_code: u32,
    pub forecast_avg_temp_c: f64,
    pub forecast_condition_code: u32,
}

impl WeatherSnapshot {
    pub fn is_raining(&self) -> bool {
        [self.forecast_condition_code, self.current_condition_code]
            .iter()
            .any(|code| RAIN_CONDITION_CODES.contains(code))
    }

    pub fn is_hot(&self) -> bool {
        self.temperatures().any(|temp| temp > HIGH_TEMP_C)
    }

    pub fn is_freezing(&self) -> bool {
        self.temperatures().any(|temp| temp < LOW_TEMP_C)
    }

    fn temperatures(&self) -> impl Iterator<Item = f64> {
        [self.forecast_avg_temp_c, self.current_temp_c].into_iter()
    }
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    current: CurrentBlock,
    forecast: ForecastBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct ForecastBlock {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    avgtemp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    code: u32,
}

impl TryFrom<ForecastBody> for WeatherSnapshot {
    type Error = &'static str;

    fn try_from(body: ForecastBody) -> Result<Self, Self::Error> {
        let today = body
            .forecast
            .forecastday
            .into_iter()
            .next()
            .ok_or("forecast contained no days")?;

        Ok(Self {
            current_temp_c: body.current.temp_c,
            current_condition_code: body.current.condition.code,
            forecast_avg_temp_c: today.day.avgtemp_c,
            forecast_condition_code: today.day.condition.code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(current_temp: f64, current_code: u32, avg_temp: f64, day_code: u32) -> serde_json::Value {
        json!({
            "location": { "name": "Dundee" },
            "current": { "temp_c": current_temp, "condition": { "text": "x", "code": current_code } },
            "forecast": { "forecastday": [
                { "date": "2021-04-25", "day": { "avgtemp_c": avg_temp, "condition": { "code": day_code } } }
            ] }
        })
    }

    #[test]
    fn decodes_provider_forecast() {
        let snapshot: WeatherSnapshot =
            serde_json::from_value(body(11.5, 1000, 9.0, 1183)).expect("forecast decodes");
        assert_eq!(
            snapshot,
            WeatherSnapshot {
                current_temp_c: 11.5,
                current_condition_code: 1000,
                forecast_avg_temp_c: 9.0,
                forecast_condition_code: 1183,
            }
        );
        assert!(snapshot.is_raining());
        assert!(!snapshot.is_hot());
        assert!(!snapshot.is_freezing());
    }

    #[test]
    fn thresholds_are_strict() {
        let edge: WeatherSnapshot =
            serde_json::from_value(body(23.0, 1000, 2.0, 1000)).expect("forecast decodes");
        assert!(!edge.is_hot());
        assert!(!edge.is_freezing());

        let cold: WeatherSnapshot =
            serde_json::from_value(body(5.0, 1000, 1.9, 1000)).expect("forecast decodes");
        assert!(cold.is_freezing());
    }

    #[test]
    fn empty_forecast_is_rejected() {
        let result = serde_json::from_value::<WeatherSnapshot>(json!({
            "current": { "temp_c": 4.0, "condition": { "code": 1000 } },
            "forecast": { "forecastday": [] }
        }));
        assert!(result.is_err());
    }
}

//! Test doubles and fixtures shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use garden_core::skill::{
    Application, Intent, ResolutionAuthority, ResolutionValue, Resolutions, ResolvedEntity,
    Session, SkillEvent, SkillRequest, Slot, User, UserKey,
};
use serde_json::{Map, Value, json};

use crate::config::{DEFAULT_REPROMPT_TEXT, SkillConfig};
use crate::gateway::{Endpoint, EndpointKind, GatewayError, PlantGateway};
use crate::intents::Turn;

pub const TEST_SKILL_ID: &str = "amzn1.ask.skill.test";
pub const TEST_USER_ID: &str = "amzn1.ask.account.TESTUSER";

pub fn test_config() -> SkillConfig {
    SkillConfig {
        skill_id: TEST_SKILL_ID.to_string(),
        plant_api_url: "http://plants.test/api".to_string(),
        weather_api_url: "http://weather.test/v1".to_string(),
        weather_api_key: "test-key".to_string(),
        weather_location: "Dundee".to_string(),
        timezone: chrono_tz::Europe::London,
        remote_timeout: Duration::from_secs(5),
        reprompt_text: DEFAULT_REPROMPT_TEXT.to_string(),
    }
}

/// Noon on the given day in the test timezone.
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Tz> {
    chrono_tz::Europe::London
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
}

/// In-memory plant service. Reads answer from canned responses (JSON `null`
/// when none is registered); writes track a per-user set of plants and
/// answer `1`/`0` the way the real service does.
pub struct StubGateway {
    responses: HashMap<Endpoint, Value>,
    garden: Mutex<HashSet<(UserKey, String)>>,
    calls: Mutex<Vec<EndpointKind>>,
    failing_status: Option<u16>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            garden: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            failing_status: None,
        }
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            failing_status: Some(status),
            ..Self::new()
        }
    }

    pub fn with(mut self, endpoint: Endpoint, response: Value) -> Self {
        self.responses.insert(endpoint, response);
        self
    }

    pub fn calls(&self) -> Vec<EndpointKind> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, kind: EndpointKind) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(kind);
        match self.failing_status {
            Some(status) => Err(GatewayError::Status {
                endpoint: kind,
                status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlantGateway for StubGateway {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, GatewayError> {
        self.record(endpoint.kind())?;
        Ok(self.responses.get(endpoint).cloned().unwrap_or(Value::Null))
    }

    async fn submit(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError> {
        self.record(kind)?;
        let mut garden = self.garden.lock().unwrap_or_else(|e| e.into_inner());
        let added = garden.insert((user_key.clone(), plant.to_string()));
        Ok(json!(if added { 1 } else { 0 }))
    }

    async fn remove(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError> {
        self.record(kind)?;
        let mut garden = self.garden.lock().unwrap_or_else(|e| e.into_inner());
        let removed = garden.remove(&(user_key.clone(), plant.to_string()));
        Ok(json!(if removed { "1" } else { "0" }))
    }
}

pub fn turn<'a>(config: &'a SkillConfig, gateway: &'a dyn PlantGateway) -> Turn<'a> {
    Turn {
        attributes: Map::new(),
        user_key: UserKey::derive(TEST_USER_ID),
        config,
        gateway,
        now: at(2021, 4, 25),
    }
}

/// Intent whose entity slots resolved to the given canonical names
/// (`None` for a spoken term that matched nothing).
pub fn intent(name: &str, slots: &[(&str, Option<&str>)]) -> Intent {
    let slots = slots
        .iter()
        .map(|(slot_name, resolved)| {
            let values = resolved
                .map(|entity| {
                    vec![ResolutionValue {
                        value: ResolvedEntity {
                            name: entity.to_string(),
                            id: None,
                        },
                    }]
                })
                .unwrap_or_default();
            let slot = Slot {
                name: Some(slot_name.to_string()),
                value: Some(resolved.unwrap_or("something unknown").to_lowercase()),
                resolutions: Some(Resolutions {
                    resolutions_per_authority: vec![ResolutionAuthority {
                        authority: Some("amzn1.er-authority.echo-sdk.test".to_string()),
                        values,
                    }],
                }),
            };
            (slot_name.to_string(), slot)
        })
        .collect();
    Intent {
        name: name.to_string(),
        slots,
    }
}

/// Intent with built-in slots that carry only a spoken value.
pub fn spoken_intent(name: &str, slots: &[(&str, &str)]) -> Intent {
    let slots = slots
        .iter()
        .map(|(slot_name, spoken)| {
            let slot = Slot {
                name: Some(slot_name.to_string()),
                value: Some(spoken.to_string()),
                resolutions: None,
            };
            (slot_name.to_string(), slot)
        })
        .collect();
    Intent {
        name: name.to_string(),
        slots,
    }
}

pub fn event(application_id: &str, request: SkillRequest) -> SkillEvent {
    SkillEvent {
        session: Session {
            session_id: Some("amzn1.echo-api.session.test".to_string()),
            application: Application {
                application_id: application_id.to_string(),
            },
            new: false,
            user: User {
                user_id: TEST_USER_ID.to_string(),
            },
            attributes: Map::new(),
        },
        request,
    }
}

pub fn user_plant(plant: &str, water: &str, temp: &str) -> Value {
    json!({ "plant": plant, "water": water, "temp": temp })
}

pub fn forecast(current_temp: f64, current_code: u32, avg_temp: f64, day_code: u32) -> Value {
    json!({
        "current": { "temp_c": current_temp, "condition": { "code": current_code } },
        "forecast": { "forecastday": [
            { "day": { "avgtemp_c": avg_temp, "condition": { "code": day_code } } }
        ] }
    })
}

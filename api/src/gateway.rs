//! Remote Data Gateway: the plant service and the weather provider.
//!
//! `PlantGateway` is the raw JSON seam (one method per HTTP verb). The free
//! functions below it decode that JSON into the typed records handlers use.

use std::fmt;

use async_trait::async_trait;
use chrono::Month;
use garden_core::calendar::month_number;
use garden_core::plants::{PlantProfile, PlantingCalendar, UserPlant};
use garden_core::skill::UserKey;
use garden_core::weather::WeatherSnapshot;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::SkillConfig;

const FORECAST_DAYS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    PlantCalendar,
    UserPlants,
    WeatherForecast,
    PlantsByMonth,
    PlantDetail,
    HealthCheck,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlantCalendar => "plant_calendar",
            Self::UserPlants => "user_plants",
            Self::WeatherForecast => "weather_forecast",
            Self::PlantsByMonth => "plants_by_month",
            Self::PlantDetail => "plant_detail",
            Self::HealthCheck => "health_check",
        };
        f.write_str(name)
    }
}

/// A readable remote resource, with the parameter that selects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PlantCalendar(String),
    UserPlants(UserKey),
    WeatherForecast { location: String, days: u8 },
    PlantsByMonth(Month),
    PlantDetail(String),
    Ping,
}

impl Endpoint {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Self::PlantCalendar(_) => EndpointKind::PlantCalendar,
            Self::UserPlants(_) => EndpointKind::UserPlants,
            Self::WeatherForecast { .. } => EndpointKind::WeatherForecast,
            Self::PlantsByMonth(_) => EndpointKind::PlantsByMonth,
            Self::PlantDetail(_) => EndpointKind::PlantDetail,
            Self::Ping => EndpointKind::HealthCheck,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: EndpointKind },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: EndpointKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: EndpointKind, status: u16 },
    #[error("{endpoint} responded with an empty body")]
    EmptyBody { endpoint: EndpointKind },
    #[error("{endpoint} responded with a body that could not be decoded: {source}")]
    Decode {
        endpoint: EndpointKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} responded with an unrecognised write result: {body}")]
    UnexpectedWriteResult { endpoint: EndpointKind, body: String },
    #[error("{endpoint} does not accept writes")]
    Unsupported { endpoint: EndpointKind },
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[async_trait]
pub trait PlantGateway: Send + Sync {
    /// GET a resource and parse its body as JSON.
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, GatewayError>;

    /// POST a (user, plant) pair to a writable collection.
    async fn submit(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError>;

    /// DELETE a (user, plant) pair from a writable collection.
    async fn remove(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError>;
}

/// reqwest-backed gateway. One client (and connection pool) per process.
pub struct HttpGateway {
    client: reqwest::Client,
    plant_api: Url,
    weather_api: Url,
    weather_api_key: String,
}

impl HttpGateway {
    pub fn new(config: &SkillConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            plant_api: parse_base(&config.plant_api_url)?,
            weather_api: parse_base(&config.weather_api_url)?,
            weather_api_key: config.weather_api_key.clone(),
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> Url {
        match endpoint {
            Endpoint::PlantCalendar(plant) => {
                join(&self.plant_api, &["PlantingCalendar", plant.as_str()])
            }
            Endpoint::UserPlants(user_key) => {
                join(&self.plant_api, &["UserData", user_key.as_str()])
            }
            Endpoint::WeatherForecast { location, days } => {
                let mut url = join(&self.weather_api, &["forecast.json"]);
                url.query_pairs_mut()
                    .append_pair("key", &self.weather_api_key)
                    .append_pair("q", location)
                    .append_pair("days", &days.to_string());
                url
            }
            Endpoint::PlantsByMonth(month) => {
                let number = month_number(*month).to_string();
                join(&self.plant_api, &["PlantingCalendar", "month", number.as_str()])
            }
            Endpoint::PlantDetail(plant) => join(&self.plant_api, &["PlantData", plant.as_str()]),
            Endpoint::Ping => join(&self.plant_api, &["Main", "ping"]),
        }
    }

    fn write_url(&self, kind: EndpointKind, user_key: &UserKey, plant: &str) -> Result<Url, GatewayError> {
        if kind != EndpointKind::UserPlants {
            return Err(GatewayError::Unsupported { endpoint: kind });
        }
        let mut url = join(&self.plant_api, &["UserData"]);
        url.query_pairs_mut()
            .append_pair("userID", user_key.as_str())
            .append_pair("plant", plant);
        Ok(url)
    }

    /// Send a request and parse the body. `unchanged_on` names the status the
    /// service uses for "nothing to do" on writes; it maps to `false`.
    async fn send(
        &self,
        kind: EndpointKind,
        request: reqwest::RequestBuilder,
        unchanged_on: Option<StatusCode>,
    ) -> Result<Value, GatewayError> {
        let response = request.send().await.map_err(|e| transport_error(kind, e))?;
        let status = response.status();
        tracing::debug!(endpoint = %kind, status = status.as_u16(), "remote call completed");

        if unchanged_on == Some(status) {
            return Ok(Value::Bool(false));
        }
        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint: kind,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| transport_error(kind, e))?;
        parse_body(kind, &body)
    }
}

#[async_trait]
impl PlantGateway for HttpGateway {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, GatewayError> {
        let request = self.client.get(self.url_for(endpoint));
        self.send(endpoint.kind(), request, None).await
    }

    async fn submit(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError> {
        let request = self.client.post(self.write_url(kind, user_key, plant)?);
        self.send(kind, request, Some(StatusCode::CONFLICT)).await
    }

    async fn remove(
        &self,
        kind: EndpointKind,
        user_key: &UserKey,
        plant: &str,
    ) -> Result<Value, GatewayError> {
        let request = self.client.delete(self.write_url(kind, user_key, plant)?);
        self.send(kind, request, Some(StatusCode::NOT_FOUND)).await
    }
}

fn parse_base(raw: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(raw).map_err(|e| GatewayError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

/// Append percent-encoded path segments to a base url.
fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn transport_error(endpoint: EndpointKind, source: reqwest::Error) -> GatewayError {
    if source.is_timeout() {
        GatewayError::Timeout { endpoint }
    } else {
        GatewayError::Transport { endpoint, source }
    }
}

pub(crate) fn parse_body(endpoint: EndpointKind, body: &str) -> Result<Value, GatewayError> {
    if body.trim().is_empty() {
        return Err(GatewayError::EmptyBody { endpoint });
    }
    serde_json::from_str(body).map_err(|source| GatewayError::Decode { endpoint, source })
}

fn decode<T: DeserializeOwned>(endpoint: EndpointKind, value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|source| GatewayError::Decode { endpoint, source })
}

/// Whether a write changed the user's garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// Already present (on add) or not present (on remove)
    Unchanged,
}

/// Interpret the plant service's write result. It answers `1`/`0` (as a
/// number or a string); booleans, status words, and objects carrying a
/// `result` or `status` field are accepted as well.
pub fn write_outcome(endpoint: EndpointKind, value: &Value) -> Result<WriteOutcome, GatewayError> {
    let unexpected = || GatewayError::UnexpectedWriteResult {
        endpoint,
        body: value.to_string(),
    };

    match value {
        Value::Bool(true) => Ok(WriteOutcome::Applied),
        Value::Bool(false) => Ok(WriteOutcome::Unchanged),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(WriteOutcome::Applied),
            Some(0) => Ok(WriteOutcome::Unchanged),
            _ => Err(unexpected()),
        },
        Value::String(word) => match word.trim().to_lowercase().as_str() {
            "1" | "true" | "ok" | "added" | "created" | "removed" | "deleted" => {
                Ok(WriteOutcome::Applied)
            }
            "0" | "false" | "exists" | "duplicate" | "not_found" | "not found" => {
                Ok(WriteOutcome::Unchanged)
            }
            _ => Err(unexpected()),
        },
        Value::Object(fields) => fields
            .get("result")
            .or_else(|| fields.get("status"))
            .filter(|inner| !inner.is_object())
            .ok_or_else(unexpected)
            .and_then(|inner| write_outcome(endpoint, inner)),
        _ => Err(unexpected()),
    }
}

pub async fn planting_calendar(
    gateway: &dyn PlantGateway,
    plant: &str,
) -> Result<Option<PlantingCalendar>, GatewayError> {
    let endpoint = Endpoint::PlantCalendar(plant.to_string());
    let value = gateway.fetch(&endpoint).await?;
    decode(endpoint.kind(), value)
}

pub async fn plant_profile(
    gateway: &dyn PlantGateway,
    plant: &str,
) -> Result<Option<PlantProfile>, GatewayError> {
    let endpoint = Endpoint::PlantDetail(plant.to_string());
    let value = gateway.fetch(&endpoint).await?;
    decode(endpoint.kind(), value)
}

pub async fn user_plants(
    gateway: &dyn PlantGateway,
    user_key: &UserKey,
) -> Result<Vec<UserPlant>, GatewayError> {
    let endpoint = Endpoint::UserPlants(user_key.clone());
    let value = gateway.fetch(&endpoint).await?;
    let plants: Option<Vec<UserPlant>> = decode(endpoint.kind(), value)?;
    Ok(plants.unwrap_or_default())
}

pub async fn plants_for_month(
    gateway: &dyn PlantGateway,
    month: Month,
) -> Result<Vec<String>, GatewayError> {
    let endpoint = Endpoint::PlantsByMonth(month);
    let value = gateway.fetch(&endpoint).await?;
    let plants: Option<Vec<String>> = decode(endpoint.kind(), value)?;
    Ok(plants.unwrap_or_default())
}

pub async fn weather_forecast(
    gateway: &dyn PlantGateway,
    location: &str,
) -> Result<WeatherSnapshot, GatewayError> {
    let endpoint = Endpoint::WeatherForecast {
        location: location.to_string(),
        days: FORECAST_DAYS,
    };
    let value = gateway.fetch(&endpoint).await?;
    decode(endpoint.kind(), value)
}

pub async fn remember_plant(
    gateway: &dyn PlantGateway,
    user_key: &UserKey,
    plant: &str,
) -> Result<WriteOutcome, GatewayError> {
    let value = gateway
        .submit(EndpointKind::UserPlants, user_key, plant)
        .await?;
    write_outcome(EndpointKind::UserPlants, &value)
}

pub async fn forget_plant(
    gateway: &dyn PlantGateway,
    user_key: &UserKey,
    plant: &str,
) -> Result<WriteOutcome, GatewayError> {
    let value = gateway
        .remove(EndpointKind::UserPlants, user_key, plant)
        .await?;
    write_outcome(EndpointKind::UserPlants, &value)
}

/// Liveness probe against the plant service.
pub async fn ping(gateway: &dyn PlantGateway) -> Result<(), GatewayError> {
    gateway.fetch(&Endpoint::Ping).await.map(|_| ())
}

use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_PLANT_API_URL: &str = "https://edibleplantsapi.azurewebsites.net/api";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_WEATHER_LOCATION: &str = "Dundee";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::London;
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_REPROMPT_TEXT: &str = "You can ask about which months to start growing a particular plant, \
which plants you can grow in a given month, or for more details about a particular plant. \
You can also ask about how recent weather will affect your plants, or have me remember what you're growing.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment settings for the skill. Read once at startup.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Application id the platform must present on every event
    pub skill_id: String,
    pub plant_api_url: String,
    pub weather_api_url: String,
    pub weather_api_key: String,
    /// Location query sent to the weather provider
    pub weather_location: String,
    /// Zone used to decide what "this month" means
    pub timezone: Tz,
    pub remote_timeout: Duration,
    pub reprompt_text: String,
}

impl SkillConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));

        let timezone = match read("GARDEN_TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().map_err(|e| ConfigError::Invalid {
                var: "GARDEN_TIMEZONE",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let remote_timeout = match read("GARDEN_REMOTE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "GARDEN_REMOTE_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        };

        Ok(Self {
            skill_id: required("GARDEN_SKILL_ID")?,
            plant_api_url: base_url(read("GARDEN_PLANT_API_URL"), DEFAULT_PLANT_API_URL),
            weather_api_url: base_url(read("GARDEN_WEATHER_API_URL"), DEFAULT_WEATHER_API_URL),
            weather_api_key: required("GARDEN_WEATHER_API_KEY")?,
            weather_location: read("GARDEN_WEATHER_LOCATION")
                .unwrap_or_else(|| DEFAULT_WEATHER_LOCATION.to_string()),
            timezone,
            remote_timeout,
            reprompt_text: read("GARDEN_REPROMPT_TEXT")
                .unwrap_or_else(|| DEFAULT_REPROMPT_TEXT.to_string()),
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

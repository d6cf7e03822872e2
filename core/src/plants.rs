//! Records served by the plant service.

use chrono::Month;
use serde::Deserialize;
use thiserror::Error;

use crate::calendar::{deserialize_month, month_from_number};

/// How much water a plant needs relative to other edible plants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum WaterNeed {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    /// A tier the service sent that the skill has no advice for
    Unrated(String),
}

impl From<String> for WaterNeed {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "VERY LOW" => Self::VeryLow,
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            "VERY HIGH" => Self::VeryHigh,
            _ => Self::Unrated(raw),
        }
    }
}

impl WaterNeed {
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High | Self::VeryHigh)
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Self::Low | Self::VeryLow)
    }
}

/// Frost tolerance, from VeryTender (least) to VeryHardy (most).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Hardiness {
    VeryTender,
    Tender,
    HalfHardy,
    Hardy,
    VeryHardy,
    Unrated(String),
}

impl From<String> for Hardiness {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "VERY TENDER" => Self::VeryTender,
            "TENDER" => Self::Tender,
            "HALF HARDY" => Self::HalfHardy,
            "HARDY" => Self::Hardy,
            "VERY HARDY" => Self::VeryHardy,
            _ => Self::Unrated(raw),
        }
    }
}

impl Hardiness {
    pub fn is_tender(&self) -> bool {
        matches!(self, Self::Tender | Self::VeryTender)
    }

    pub fn is_hardy(&self) -> bool {
        matches!(self, Self::Hardy | Self::VeryHardy)
    }
}

/// Sowing and harvest windows for one plant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CalendarRow")]
pub struct PlantingCalendar {
    pub plant: String,
    pub outdoor_start: Month,
    pub outdoor_end: Month,
    pub harvest_start: Month,
    pub harvest_end: Month,
    /// Start and end of sowing under cover; `None` when sown directly outdoors
    pub indoor: Option<(Month, Month)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarRow {
    plant: String,
    #[serde(deserialize_with = "deserialize_month")]
    outdoor_start: Month,
    #[serde(deserialize_with = "deserialize_month")]
    outdoor_end: Month,
    #[serde(deserialize_with = "deserialize_month")]
    harvest_start: Month,
    #[serde(deserialize_with = "deserialize_month")]
    harvest_end: Month,
    #[serde(default)]
    indoor_start: u32,
    #[serde(default)]
    indoor_end: u32,
}

#[derive(Debug, Error)]
#[error("indoor window {start}..{end} for '{plant}' is not a pair of months 1-12")]
pub struct IndoorWindowError {
    plant: String,
    start: u32,
    end: u32,
}

impl TryFrom<CalendarRow> for PlantingCalendar {
    type Error = IndoorWindowError;

    fn try_from(row: CalendarRow) -> Result<Self, Self::Error> {
        // indoorStart == 0 marks plants with no sowing under cover
        let indoor = if row.indoor_start == 0 {
            None
        } else {
            match (
                month_from_number(row.indoor_start),
                month_from_number(row.indoor_end),
            ) {
                (Some(start), Some(end)) => Some((start, end)),
                _ => {
                    return Err(IndoorWindowError {
                        plant: row.plant,
                        start: row.indoor_start,
                        end: row.indoor_end,
                    });
                }
            }
        };

        Ok(Self {
            plant: row.plant,
            outdoor_start: row.outdoor_start,
            outdoor_end: row.outdoor_end,
            harvest_start: row.harvest_start,
            harvest_end: row.harvest_end,
            indoor,
        })
    }
}

/// Care attributes for one plant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlantProfile {
    pub plant: String,
    pub water: WaterNeed,
    pub temp: Hardiness,
}

/// One plant in a user's Virtual Garden.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPlant {
    pub plant: String,
    pub water: WaterNeed,
    pub temp: Hardiness,
}

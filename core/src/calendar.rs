//! Month table shared by the planting-calendar intents.
//!
//! The plant service numbers months 1..=12 (January = 1). Everything inside
//! the workspace uses `chrono::Month` and converts at the wire boundary.

use chrono::{Datelike, Month};
use serde::de::{self, Deserialize, Deserializer, Unexpected};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Spoken month names, indexed from 0.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month for a 1-based wire number. `None` outside 1..=12.
pub fn month_from_number(number: u32) -> Option<Month> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// 1-based wire number for a month.
pub fn month_number(month: Month) -> u32 {
    month.number_from_month()
}

/// Spoken name for a month.
pub fn month_name(month: Month) -> &'static str {
    MONTH_NAMES[month.number_from_month() as usize - 1]
}

/// Parse a spoken month name. Accepts full names and three-letter
/// abbreviations in any case, plus the common "Febuary" misspelling.
pub fn parse_month(raw: &str) -> Option<Month> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized == "febuary" {
        return Some(Month::February);
    }
    MONTH_NAMES
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            name == normalized || (normalized.len() == 3 && name.starts_with(&normalized))
        })
        .map(|index| MONTHS[index])
}

/// Calendar month of a date.
pub fn month_of<D: Datelike>(date: &D) -> Month {
    MONTHS[date.month0() as usize]
}

/// The month after `month`; December wraps to January.
pub fn next_month(month: Month) -> Month {
    month.succ()
}

/// serde helper for required month numbers.
pub fn deserialize_month<'de, D>(deserializer: D) -> Result<Month, D::Error>
where
    D: Deserializer<'de>,
{
    let number = u32::deserialize(deserializer)?;
    month_from_number(number).ok_or_else(|| {
        de::Error::invalid_value(
            Unexpected::Unsigned(u64::from(number)),
            &"a month number between 1 and 12",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_table_is_a_bijection_over_wire_numbers() {
        for number in 1..=12u32 {
            let month = month_from_number(number).expect("valid month number");
            assert_eq!(month_number(month), number);
            assert_eq!(month_name(month), MONTH_NAMES[number as usize - 1]);
            assert_eq!(parse_month(month_name(month)), Some(month));
        }
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(month_from_number(0), None);
        assert_eq!(month_from_number(13), None);
    }

    #[test]
    fn february_is_spelled_correctly() {
        assert_eq!(month_name(Month::February), "February");
        assert_eq!(parse_month("Febuary"), Some(Month::February));
    }

    #[test]
    fn parse_accepts_case_and_abbreviations() {
        assert_eq!(parse_month("march"), Some(Month::March));
        assert_eq!(parse_month(" SEPTEMBER "), Some(Month::September));
        assert_eq!(parse_month("Oct"), Some(Month::October));
        assert_eq!(parse_month("Octo"), None);
        assert_eq!(parse_month("next"), None);
        assert_eq!(parse_month(""), None);
    }

    #[test]
    fn next_month_wraps_after_december() {
        assert_eq!(next_month(Month::November), Month::December);
        assert_eq!(next_month(Month::December), Month::January);
    }

    #[test]
    fn month_of_reads_date_month() {
        let date = chrono::NaiveDate::from_ymd_opt(2021, 4, 25).expect("valid date");
        assert_eq!(month_of(&date), Month::April);
    }

    #[test]
    fn deserialize_month_rejects_zero() {
        #[derive(serde::Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "deserialize_month")]
            month: Month,
        }

        let ok: Probe = serde_json::from_str(r#"{"month": 4}"#).expect("april decodes");
        assert_eq!(ok.month, Month::April);
        assert!(serde_json::from_str::<Probe>(r#"{"month": 0}"#).is_err());
    }
}

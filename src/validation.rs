//! Phone and date checks shared by every form.
//!
//! All helpers are total: bad input yields `false` or the input back, never a
//! panic. The `check_*` variants wrap the same rules in a `ValidationError` for
//! the submit path.

use std::sync::OnceLock;

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::ValidationError;

const PHONE_DIGITS: usize = 10;
const SCHEDULING_HORIZON_MONTHS: u32 = 5 * 12;

const DATETIME_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

fn phone_groups() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{3})(\d{3})(\d{4})$").expect("static phone regex"))
}

/// Optional 1-3 digit country code followed by exactly ten digits.
fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,3})?\d{10}$").expect("static phone regex"))
}

fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strips everything but digits, keeps at most ten, and formats a complete
/// ten-digit number as `DDD-DDD-DDDD`. Partial numbers come back as bare digits.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = digits_only(input).chars().take(PHONE_DIGITS).collect();
    match phone_groups().captures(&digits) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => digits,
    }
}

pub fn is_valid_phone(input: &str) -> bool {
    phone_pattern().is_match(&digits_only(input))
}

pub fn check_phone(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::MissingField("phone_number"));
    }
    if is_valid_phone(input) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(input.to_string()))
    }
}

/// Inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        Self { min, max }
    }

    /// 1900-01-01 through 2100-12-31.
    pub fn general() -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN),
            max: NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Today through five years from today, for anything being scheduled.
    pub fn scheduling(today: NaiveDate) -> Self {
        Self {
            min: today,
            max: today
                .checked_add_months(Months::new(SCHEDULING_HORIZON_MONTHS))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Same upper bound, tighter lower bound. Used for end dates that may not
    /// precede their start date.
    pub fn starting_at(self, min: NaiveDate) -> Self {
        Self {
            min: min.max(self.min),
            max: self.max,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

/// Reads a `datetime-local` style value (`YYYY-MM-DDTHH:MM[:SS]`).
pub fn parse_datetime_input(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Reads a plain date, a `datetime-local` value or an RFC 3339 timestamp and
/// keeps only the calendar date.
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime_input(input).map(|dt| dt.date()))
}

/// [`parse_date_input`] with an error naming `field`.
pub fn read_date(field: &'static str, input: &str) -> Result<NaiveDate, ValidationError> {
    parse_date_input(input).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: input.to_string(),
    })
}

/// [`parse_datetime_input`] with an error naming `field`.
pub fn read_datetime(field: &'static str, input: &str) -> Result<NaiveDateTime, ValidationError> {
    parse_datetime_input(input).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: input.to_string(),
    })
}

pub fn is_valid_date(input: &str, lower: NaiveDate, upper: NaiveDate) -> bool {
    parse_date_input(input)
        .map(|date| DateBounds::new(lower, upper).contains(date))
        .unwrap_or(false)
}

pub fn check_date(
    field: &'static str,
    date: NaiveDate,
    bounds: DateBounds,
) -> Result<(), ValidationError> {
    if bounds.contains(date) {
        Ok(())
    } else {
        Err(ValidationError::DateOutOfRange {
            field,
            value: date,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Fixed-width RFC 3339 in UTC, so text order in SQLite is time order.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>> {
    match value {
        Some(raw) => parse_date(&raw, field).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetimes_sort_lexically() {
        let a = parse_datetime("2024-03-10T09:00:00Z", "a").unwrap();
        let b = parse_datetime("2024-03-10T09:00:00.5Z", "b").unwrap();
        let c = parse_datetime("2024-03-10T10:00:00+01:00", "c").unwrap();
        let mut formatted = vec![format_datetime(&b), format_datetime(&a), format_datetime(&c)];
        formatted.sort();
        assert_eq!(
            formatted,
            vec![
                "2024-03-10T09:00:00.000Z",
                "2024-03-10T09:00:00.000Z",
                "2024-03-10T09:00:00.500Z",
            ]
        );
    }

    #[test]
    fn bad_dates_name_the_field() {
        let err = parse_date("03/10/2024", "start_date").unwrap_err();
        assert!(err.to_string().contains("start_date"));
        assert_eq!(parse_optional_date(None, "end_date").unwrap(), None);
    }
}

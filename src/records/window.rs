use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Time window applied on top of the text filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeWindow {
    All,
    #[default]
    Today,
    /// Monday through Sunday of the current week.
    ThisWeek,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::Today => "today",
            TimeWindow::ThisWeek => "this-week",
        }
    }

    /// Whether `at`, seen in `now`'s time zone, falls inside the window.
    pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
        let day = at.date_naive();
        let today = now.date_naive();
        match self {
            TimeWindow::All => true,
            TimeWindow::Today => day == today,
            TimeWindow::ThisWeek => week_start(day) == week_start(today),
        }
    }
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TimeWindow::All),
            "today" => Ok(TimeWindow::Today),
            "this-week" | "week" | "thisweek" => Ok(TimeWindow::ThisWeek),
            other => Err(anyhow!("unknown time window '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2024-03-10 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(week_start(sunday), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn today_compares_calendar_days() {
        let now = at("2024-03-13T12:00:00Z");
        assert!(TimeWindow::Today.contains(&at("2024-03-13T00:00:00Z"), &now));
        assert!(TimeWindow::Today.contains(&at("2024-03-13T23:59:59Z"), &now));
        assert!(!TimeWindow::Today.contains(&at("2024-03-12T23:59:59Z"), &now));
    }

    #[test]
    fn this_week_excludes_previous_sunday() {
        let now = at("2024-03-13T12:00:00Z"); // Wednesday
        assert!(TimeWindow::ThisWeek.contains(&at("2024-03-11T08:00:00Z"), &now));
        assert!(TimeWindow::ThisWeek.contains(&at("2024-03-17T20:00:00Z"), &now));
        assert!(!TimeWindow::ThisWeek.contains(&at("2024-03-10T20:00:00Z"), &now));
    }

    #[test]
    fn day_boundaries_follow_the_local_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = at("2024-03-13T15:00:00Z").with_timezone(&tz);
        // 02:00 UTC on the 14th is still the evening of the 13th at UTC-5.
        let late = at("2024-03-14T02:00:00Z").with_timezone(&tz);
        assert!(TimeWindow::Today.contains(&late, &now));
    }

    #[test]
    fn parses_window_names() {
        assert_eq!("all".parse::<TimeWindow>().unwrap(), TimeWindow::All);
        assert_eq!("Today".parse::<TimeWindow>().unwrap(), TimeWindow::Today);
        assert_eq!("week".parse::<TimeWindow>().unwrap(), TimeWindow::ThisWeek);
        assert!("month".parse::<TimeWindow>().is_err());
    }
}

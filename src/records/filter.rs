use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{Record, TimeWindow};

/// Free-text query ANDed with a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub query: String,
    pub window: TimeWindow,
}

impl RecordFilter {
    pub fn new(query: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            query: query.into(),
            window,
        }
    }

    /// Everything passes.
    pub fn all() -> Self {
        Self::new("", TimeWindow::All)
    }

    /// True when the filter can hide records, which is what decides between the
    /// "nothing logged yet" and "nothing matches" empty states.
    pub fn is_narrowing(&self) -> bool {
        !self.query.is_empty() || self.window != TimeWindow::All
    }

    pub fn matches_text<R: Record>(&self, record: &R) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        record.category().to_lowercase().contains(&needle)
            || record.description().to_lowercase().contains(&needle)
    }

    pub fn matches<R: Record, Tz: TimeZone>(&self, record: &R, now: &DateTime<Tz>) -> bool {
        let at = record.timestamp().with_timezone(&now.timezone());
        self.matches_text(record) && self.window.contains(&at, now)
    }
}

/// Keeps the input order.
pub fn filter_records<'a, R: Record, Tz: TimeZone>(
    records: &'a [R],
    filter: &RecordFilter,
    now: &DateTime<Tz>,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| filter.matches(*record, now))
        .collect()
}

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone};

use super::Record;

/// Records sharing one calendar date in the display time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a, R> {
    pub date: NaiveDate,
    pub label: String,
    pub records: Vec<&'a R>,
}

impl<R> DayGroup<'_, R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Buckets records by calendar day in `now`'s time zone.
///
/// Buckets come out in order of first appearance and each keeps the relative
/// order of its input, so a newest-first input gives newest-day-first groups.
pub fn group_by_day<'a, R, Tz, I>(records: I, now: &DateTime<Tz>) -> Vec<DayGroup<'a, R>>
where
    R: Record,
    Tz: TimeZone,
    I: IntoIterator<Item = &'a R>,
{
    let tz = now.timezone();
    let today = now.date_naive();
    let mut groups: Vec<DayGroup<'a, R>> = Vec::new();
    let mut slots: HashMap<NaiveDate, usize> = HashMap::new();

    for record in records {
        let date = record.timestamp().with_timezone(&tz).date_naive();
        let slot = *slots.entry(date).or_insert_with(|| {
            groups.push(DayGroup {
                date,
                label: day_label(date, today),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

/// "Today", "Yesterday", or e.g. "Sunday, March 10, 2024".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%A, %B %-d, %Y").to_string()
    }
}

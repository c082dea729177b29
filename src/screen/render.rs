use std::fmt::Write;

use chrono::{DateTime, TimeZone};

use super::ScreenView;
use crate::records::{Record, RecordKind};

pub fn empty_message(kind: RecordKind) -> String {
    format!(
        "No {} logged yet. Use `carelog add {}` to add the first one.",
        kind.plural(),
        kind.singular()
    )
}

pub fn no_matches_message(kind: RecordKind) -> String {
    format!("No {} found matching your search criteria.", kind.plural())
}

/// Plain-text rendering of a list screen, times shown in `now`'s zone.
pub fn render_view<R, Tz>(view: &ScreenView<'_, R>, now: &DateTime<Tz>) -> String
where
    R: Record,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    match view {
        ScreenView::Loading => out.push_str(&format!("Loading {}...\n", R::KIND.plural())),
        ScreenView::Empty => {
            out.push_str(&empty_message(R::KIND));
            out.push('\n');
        }
        ScreenView::NoMatches => {
            out.push_str(&no_matches_message(R::KIND));
            out.push('\n');
        }
        ScreenView::Grouped(groups) => {
            let tz = now.timezone();
            for (index, group) in groups.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", group.label);
                for record in &group.records {
                    let local = record.timestamp().with_timezone(&tz);
                    let _ = write!(
                        out,
                        "  {:>8}  {}",
                        local.format("%-I:%M %p").to_string(),
                        record.category()
                    );
                    if !record.description().is_empty() {
                        let _ = write!(out, ": {}", record.description());
                    }
                    let _ = writeln!(out, "  [{}]", record.id());
                }
            }
        }
    }
    out
}

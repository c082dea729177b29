//! Dashboard summary: a few recent rows of each kind plus insight text.
//!
//! Insight and suggestion text comes from an [`InsightProvider`]; the default
//! one returns fixed copy. A provider that actually looks at the data can be
//! dropped in without touching loading or rendering.

mod insights;

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::{
    db::{
        models::{Activity, Appointment, Medication},
        Database,
    },
    identity::OwnerId,
    log_error,
};

pub use insights::{Insight, InsightProvider, InsightTone, StaticInsights};

const ENABLE_LOGS: bool = true;

const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub data: DashboardData,
    pub insights: Vec<Insight>,
    pub suggestions: Vec<String>,
}

/// Three most recent medications, next three appointments from `now`, three
/// most recent activities. A failed query leaves that section empty.
pub async fn load_dashboard_data(
    db: &Database,
    owner: &OwnerId,
    now: DateTime<Utc>,
) -> DashboardData {
    let owner_id = owner.as_str();
    let (medications, appointments, activities) = tokio::join!(
        db.list_medications(owner_id, Some(RECENT_LIMIT)),
        db.upcoming_appointments(owner_id, now, Some(RECENT_LIMIT)),
        db.list_activities(owner_id, Some(RECENT_LIMIT)),
    );

    DashboardData {
        medications: medications.unwrap_or_else(|err| {
            log_error!("Error fetching dashboard medications: {err:#}");
            Vec::new()
        }),
        appointments: appointments.unwrap_or_else(|err| {
            log_error!("Error fetching dashboard appointments: {err:#}");
            Vec::new()
        }),
        activities: activities.unwrap_or_else(|err| {
            log_error!("Error fetching dashboard activities: {err:#}");
            Vec::new()
        }),
    }
}

pub async fn load_dashboard(
    db: &Database,
    owner: &OwnerId,
    now: DateTime<Utc>,
    provider: &dyn InsightProvider,
) -> DashboardSummary {
    let data = load_dashboard_data(db, owner, now).await;
    DashboardSummary {
        insights: provider.insights(&data),
        suggestions: provider.suggestions(&data),
        data,
    }
}

pub fn render_dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Health insights");
    for insight in &summary.insights {
        let _ = writeln!(
            out,
            "  [{}] {}: {}",
            insight.tone.as_str(),
            insight.title,
            insight.description
        );
    }

    let _ = writeln!(out, "\nSuggestions");
    for suggestion in &summary.suggestions {
        let _ = writeln!(out, "  - {suggestion}");
    }

    let _ = writeln!(out, "\nMedications");
    if summary.data.medications.is_empty() {
        let _ = writeln!(out, "  No medications added yet.");
    }
    for med in &summary.data.medications {
        let _ = writeln!(out, "  {} - {}", med.name, med.dosage);
    }

    let _ = writeln!(out, "\nUpcoming appointments");
    if summary.data.appointments.is_empty() {
        let _ = writeln!(out, "  No upcoming appointments.");
    }
    for apt in &summary.data.appointments {
        let local = apt.appointment_date.with_timezone(&Local);
        let _ = writeln!(out, "  {} - {}", apt.title, local.format("%-m/%-d/%Y"));
    }

    let _ = writeln!(out, "\nRecent activities");
    if summary.data.activities.is_empty() {
        let _ = writeln!(out, "  No activities logged yet.");
    }
    for activity in &summary.data.activities {
        let local = activity.completed_at.with_timezone(&Local);
        let _ = writeln!(
            out,
            "  {}: {} ({})",
            activity.activity_type,
            activity.description,
            local.format("%-m/%-d/%Y %-I:%M %p")
        );
    }

    out
}

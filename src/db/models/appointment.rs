//! Appointment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    records::{Record, RecordInput, RecordKind},
    validation::{check_date, require_text, DateBounds},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub location: String,
    pub notes: String,
    pub appointment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub title: String,
    pub location: String,
    pub notes: String,
    pub appointment_date: DateTime<Utc>,
}

impl Record for Appointment {
    type Input = AppointmentInput;

    const KIND: RecordKind = RecordKind::Appointment;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn category(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.notes
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.appointment_date
    }
}

impl RecordInput for AppointmentInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        check_date(
            "appointment_date",
            self.appointment_date.date_naive(),
            DateBounds::general(),
        )
    }
}

//! Medication models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    records::{Record, RecordInput, RecordKind},
    validation::{check_date, require_text, DateBounds},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub dosage: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    pub name: String,
    pub dosage: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Record for Medication {
    type Input = MedicationInput;

    const KIND: RecordKind = RecordKind::Medication;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn category(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.dosage
    }

    /// Medications are listed in the order they were added.
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl RecordInput for MedicationInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("dosage", &self.dosage)?;
        check_date("start_date", self.start_date, DateBounds::general())?;
        if let Some(end) = self.end_date {
            check_date("end_date", end, DateBounds::general())?;
            if end < self.start_date {
                return Err(ValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

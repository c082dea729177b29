//! Daily activity models.
//!
//! An activity is something the person did, logged with the time it was
//! completed. The type is one of a fixed set of choices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    records::{Record, RecordInput, RecordKind},
    validation::{check_date, require_text, DateBounds},
};

pub const ACTIVITY_TYPES: [&str; 7] = [
    "Exercise",
    "Walking",
    "Medication",
    "Meal",
    "Social",
    "Appointment",
    "Other",
];

pub fn is_activity_type(value: &str) -> bool {
    ACTIVITY_TYPES.contains(&value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub owner_id: String,
    pub activity_type: String,
    pub description: String,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub activity_type: String,
    pub description: String,
    pub completed_at: DateTime<Utc>,
}

impl Record for Activity {
    type Input = ActivityInput;

    const KIND: RecordKind = RecordKind::Activity;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn category(&self) -> &str {
        &self.activity_type
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

impl RecordInput for ActivityInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("activity_type", &self.activity_type)?;
        if !is_activity_type(&self.activity_type) {
            return Err(ValidationError::InvalidChoice {
                field: "activity_type",
                value: self.activity_type.clone(),
            });
        }
        require_text("description", &self.description)?;
        check_date(
            "completed_at",
            self.completed_at.date_naive(),
            DateBounds::general(),
        )
    }
}

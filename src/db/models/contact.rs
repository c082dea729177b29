//! Emergency contact models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    records::{Record, RecordInput, RecordKind},
    validation::{check_phone, require_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
}

impl Record for Contact {
    type Input = ContactInput;

    const KIND: RecordKind = RecordKind::Contact;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn category(&self) -> &str {
        &self.relationship
    }

    fn description(&self) -> &str {
        &self.name
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl RecordInput for ContactInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("relationship", &self.relationship)?;
        check_phone(&self.phone_number)
    }
}

use chrono::{DateTime, TimeZone, Timelike, Utc};

use super::{Draft, FieldContext};
use crate::{
    db::models::{
        activity::is_activity_type, ActivityInput, AppointmentInput, ContactInput,
        MedicationInput,
    },
    error::ValidationError,
    validation::{check_date, normalize_phone, read_date, read_datetime, DateBounds},
};

type FieldResult = Result<(), ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Type,
    Description,
    CompletedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationField {
    Name,
    Dosage,
    StartDate,
    EndDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentField {
    Title,
    Location,
    Notes,
    ScheduledAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Relationship,
    Phone,
}

/// Minute precision, like a `datetime-local` input.
fn to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(at)
}

/// Parses a wall-clock input and keeps it only if its date is inside `bounds`.
fn datetime_within<Tz: TimeZone>(
    field: &'static str,
    raw: &str,
    bounds: DateBounds,
    ctx: &FieldContext<Tz>,
) -> Result<DateTime<Utc>, ValidationError> {
    let local = read_datetime(field, raw)?;
    check_date(field, local.date(), bounds)?;
    ctx.to_utc(local).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

impl Draft for ActivityInput {
    type Field = ActivityField;

    fn fresh<Tz: TimeZone>(ctx: &FieldContext<Tz>) -> Self {
        Self {
            activity_type: String::new(),
            description: String::new(),
            completed_at: to_minute(ctx.now_utc()),
        }
    }

    fn apply<Tz: TimeZone>(
        &mut self,
        field: ActivityField,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> FieldResult {
        match field {
            ActivityField::Type => {
                // Blank is the "select a type" placeholder.
                if !raw.is_empty() && !is_activity_type(raw) {
                    return Err(ValidationError::InvalidChoice {
                        field: "activity_type",
                        value: raw.to_string(),
                    });
                }
                self.activity_type = raw.to_string();
            }
            ActivityField::Description => self.description = raw.to_string(),
            ActivityField::CompletedAt => {
                self.completed_at =
                    datetime_within("completed_at", raw, DateBounds::general(), ctx)?;
            }
        }
        Ok(())
    }
}

impl Draft for MedicationInput {
    type Field = MedicationField;

    fn fresh<Tz: TimeZone>(ctx: &FieldContext<Tz>) -> Self {
        Self {
            name: String::new(),
            dosage: String::new(),
            start_date: ctx.today(),
            end_date: None,
        }
    }

    fn apply<Tz: TimeZone>(
        &mut self,
        field: MedicationField,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> FieldResult {
        let bounds = DateBounds::scheduling(ctx.today());
        match field {
            MedicationField::Name => self.name = raw.to_string(),
            MedicationField::Dosage => self.dosage = raw.to_string(),
            MedicationField::StartDate => {
                let date = read_date("start_date", raw)?;
                check_date("start_date", date, bounds)?;
                self.start_date = date;
            }
            // The end date is optional; clearing it is always allowed.
            MedicationField::EndDate if raw.trim().is_empty() => self.end_date = None,
            MedicationField::EndDate => {
                let date = read_date("end_date", raw)?;
                if date < self.start_date {
                    return Err(ValidationError::EndBeforeStart {
                        start: self.start_date,
                        end: date,
                    });
                }
                check_date("end_date", date, bounds)?;
                self.end_date = Some(date);
            }
        }
        Ok(())
    }
}

impl Draft for AppointmentInput {
    type Field = AppointmentField;

    fn fresh<Tz: TimeZone>(ctx: &FieldContext<Tz>) -> Self {
        Self {
            title: String::new(),
            location: String::new(),
            notes: String::new(),
            appointment_date: to_minute(ctx.now_utc()),
        }
    }

    fn apply<Tz: TimeZone>(
        &mut self,
        field: AppointmentField,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> FieldResult {
        match field {
            AppointmentField::Title => self.title = raw.to_string(),
            AppointmentField::Location => self.location = raw.to_string(),
            AppointmentField::Notes => self.notes = raw.to_string(),
            AppointmentField::ScheduledAt => {
                let bounds = DateBounds::scheduling(ctx.today());
                self.appointment_date = datetime_within("appointment_date", raw, bounds, ctx)?;
            }
        }
        Ok(())
    }
}

impl Draft for ContactInput {
    type Field = ContactField;

    fn fresh<Tz: TimeZone>(_ctx: &FieldContext<Tz>) -> Self {
        Self::default()
    }

    fn apply<Tz: TimeZone>(
        &mut self,
        field: ContactField,
        raw: &str,
        _ctx: &FieldContext<Tz>,
    ) -> FieldResult {
        match field {
            ContactField::Name => self.name = raw.to_string(),
            ContactField::Relationship => self.relationship = raw.to_string(),
            // Formatted as typed; never rejected.
            ContactField::Phone => self.phone_number = normalize_phone(raw),
        }
        Ok(())
    }
}

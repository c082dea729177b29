use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{format_datetime, parse_datetime},
        models::{Appointment, AppointmentInput},
    },
    error,
    identity::OwnerId,
    log_debug,
    records::{RecordInput, RecordStore},
};

use super::sql_limit;

const ENABLE_LOGS: bool = true;

fn row_to_appointment(row: &Row) -> Result<Appointment> {
    let appointment_date: String = row.get("appointment_date")?;
    let created_at: String = row.get("created_at")?;

    Ok(Appointment {
        id: row.get("id")?,
        owner_id: row.get("user_id")?,
        title: row.get("title")?,
        location: row.get("location")?,
        notes: row.get("notes")?,
        appointment_date: parse_datetime(&appointment_date, "appointment_date")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// The owner's appointments, latest date first.
    pub async fn list_appointments(&self, owner_id: &str) -> Result<Vec<Appointment>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, location, notes, appointment_date, created_at
                 FROM appointments
                 WHERE user_id = ?1
                 ORDER BY appointment_date DESC, rowid DESC",
            )?;

            let mut rows = stmt.query(params![owner_id])?;
            let mut appointments = Vec::new();
            while let Some(row) = rows.next()? {
                appointments.push(row_to_appointment(row)?);
            }

            Ok(appointments)
        })
        .await
    }

    /// Appointments at or after `from`, soonest first.
    pub async fn upcoming_appointments(
        &self,
        owner_id: &str,
        from: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<Appointment>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, location, notes, appointment_date, created_at
                 FROM appointments
                 WHERE user_id = ?1 AND appointment_date >= ?2
                 ORDER BY appointment_date ASC, rowid ASC
                 LIMIT ?3",
            )?;

            let mut rows = stmt.query(params![owner_id, format_datetime(&from), sql_limit(limit)])?;
            let mut appointments = Vec::new();
            while let Some(row) = rows.next()? {
                appointments.push(row_to_appointment(row)?);
            }

            Ok(appointments)
        })
        .await
    }

    pub async fn insert_appointment(
        &self,
        owner_id: &str,
        input: AppointmentInput,
    ) -> Result<Appointment> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            let now = Utc::now();

            conn.execute(
                "INSERT INTO appointments
                    (id, user_id, title, location, notes, appointment_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    owner_id,
                    input.title,
                    input.location,
                    input.notes,
                    format_datetime(&input.appointment_date),
                    format_datetime(&now),
                ],
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, location, notes, appointment_date, created_at
                 FROM appointments
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![id])?;
            let appointment = match rows.next()? {
                Some(row) => row_to_appointment(row)?,
                None => return Err(anyhow!("Appointment not found after insert")),
            };

            Ok(appointment)
        })
        .await
    }

    pub async fn delete_appointment(&self, owner_id: &str, appointment_id: &str) -> Result<bool> {
        let owner_id = owner_id.to_string();
        let appointment_id = appointment_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM appointments WHERE id = ?1 AND user_id = ?2",
                params![appointment_id, owner_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[async_trait]
impl RecordStore<Appointment> for Database {
    async fn list(&self, owner: &OwnerId) -> error::Result<Vec<Appointment>> {
        Ok(self.list_appointments(owner.as_str()).await?)
    }

    async fn create(&self, owner: &OwnerId, input: AppointmentInput) -> error::Result<Appointment> {
        input.validate()?;
        Ok(self.insert_appointment(owner.as_str(), input).await?)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> error::Result<()> {
        if !self.delete_appointment(owner.as_str(), id).await? {
            log_debug!("No appointment {id} for {owner}; nothing to delete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn owner() -> OwnerId {
        OwnerId::new("U1").unwrap()
    }

    async fn schedule(db: &Database, title: &str, at: DateTime<Utc>) -> Appointment {
        let input = AppointmentInput {
            title: title.into(),
            location: "Clinic".into(),
            notes: String::new(),
            appointment_date: at,
        };
        RecordStore::<Appointment>::create(db, &owner(), input)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn upcoming_skips_the_past_and_sorts_ascending() {
        let db = Database::in_memory().unwrap();
        let now = Utc::now();
        schedule(&db, "Past checkup", now - Duration::days(3)).await;
        schedule(&db, "Dentist", now + Duration::days(10)).await;
        schedule(&db, "Cardiology", now + Duration::days(2)).await;
        schedule(&db, "Eye exam", now + Duration::days(30)).await;
        schedule(&db, "Physio", now + Duration::days(40)).await;

        let upcoming = db.upcoming_appointments("U1", now, Some(3)).await.unwrap();
        let titles: Vec<&str> = upcoming.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Cardiology", "Dentist", "Eye exam"]);
    }

    #[tokio::test]
    async fn list_orders_by_appointment_date_descending() {
        let db = Database::in_memory().unwrap();
        let now = Utc::now();
        schedule(&db, "Sooner", now + Duration::days(1)).await;
        schedule(&db, "Later", now + Duration::days(5)).await;

        let listed: Vec<Appointment> = db.list(&owner()).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Later", "Sooner"]);
    }

    #[tokio::test]
    async fn title_is_required() {
        let db = Database::in_memory().unwrap();
        let input = AppointmentInput {
            title: "  ".into(),
            location: String::new(),
            notes: String::new(),
            appointment_date: Utc::now(),
        };
        let err = RecordStore::<Appointment>::create(&db, &owner(), input)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}

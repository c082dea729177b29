use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{format_date, format_datetime, parse_date, parse_datetime, parse_optional_date},
        models::{Medication, MedicationInput},
    },
    error,
    identity::OwnerId,
    log_debug,
    records::{RecordInput, RecordStore},
};

use super::sql_limit;

const ENABLE_LOGS: bool = true;

fn row_to_medication(row: &Row) -> Result<Medication> {
    let start_date: String = row.get("start_date")?;
    let end_date: Option<String> = row.get("end_date")?;
    let created_at: String = row.get("created_at")?;

    Ok(Medication {
        id: row.get("id")?,
        owner_id: row.get("user_id")?,
        name: row.get("name")?,
        dosage: row.get("dosage")?,
        start_date: parse_date(&start_date, "start_date")?,
        end_date: parse_optional_date(end_date, "end_date")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// The owner's medications, most recently added first.
    pub async fn list_medications(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Medication>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, dosage, start_date, end_date, created_at
                 FROM medications
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;

            let mut rows = stmt.query(params![owner_id, sql_limit(limit)])?;
            let mut medications = Vec::new();
            while let Some(row) = rows.next()? {
                medications.push(row_to_medication(row)?);
            }

            Ok(medications)
        })
        .await
    }

    pub async fn insert_medication(
        &self,
        owner_id: &str,
        input: MedicationInput,
    ) -> Result<Medication> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            let now = Utc::now();

            conn.execute(
                "INSERT INTO medications
                    (id, user_id, name, dosage, start_date, end_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    owner_id,
                    input.name,
                    input.dosage,
                    format_date(&input.start_date),
                    input.end_date.as_ref().map(format_date),
                    format_datetime(&now),
                ],
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, dosage, start_date, end_date, created_at
                 FROM medications
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![id])?;
            let medication = match rows.next()? {
                Some(row) => row_to_medication(row)?,
                None => return Err(anyhow!("Medication not found after insert")),
            };

            Ok(medication)
        })
        .await
    }

    pub async fn delete_medication(&self, owner_id: &str, medication_id: &str) -> Result<bool> {
        let owner_id = owner_id.to_string();
        let medication_id = medication_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM medications WHERE id = ?1 AND user_id = ?2",
                params![medication_id, owner_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[async_trait]
impl RecordStore<Medication> for Database {
    async fn list(&self, owner: &OwnerId) -> error::Result<Vec<Medication>> {
        Ok(self.list_medications(owner.as_str(), None).await?)
    }

    async fn create(&self, owner: &OwnerId, input: MedicationInput) -> error::Result<Medication> {
        input.validate()?;
        Ok(self.insert_medication(owner.as_str(), input).await?)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> error::Result<()> {
        if !self.delete_medication(owner.as_str(), id).await? {
            log_debug!("No medication {id} for {owner}; nothing to delete");
        }
        Ok(())
    }
}

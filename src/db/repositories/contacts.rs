use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{format_datetime, parse_datetime},
        models::{Contact, ContactInput},
    },
    error,
    identity::OwnerId,
    log_debug,
    records::{RecordInput, RecordStore},
    validation::normalize_phone,
};

const ENABLE_LOGS: bool = true;

fn row_to_contact(row: &Row) -> Result<Contact> {
    let created_at: String = row.get("created_at")?;

    Ok(Contact {
        id: row.get("id")?,
        owner_id: row.get("user_id")?,
        name: row.get("name")?,
        relationship: row.get("relationship")?,
        phone_number: row.get("phone_number")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// The owner's emergency contacts, most recently added first.
    pub async fn list_contacts(&self, owner_id: &str) -> Result<Vec<Contact>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, relationship, phone_number, created_at
                 FROM emergency_contacts
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let mut rows = stmt.query(params![owner_id])?;
            let mut contacts = Vec::new();
            while let Some(row) = rows.next()? {
                contacts.push(row_to_contact(row)?);
            }

            Ok(contacts)
        })
        .await
    }

    /// Stores the phone number in `DDD-DDD-DDDD` form when it has ten digits.
    pub async fn insert_contact(&self, owner_id: &str, input: ContactInput) -> Result<Contact> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            let now = Utc::now();
            let digits = input
                .phone_number
                .chars()
                .filter(|c| c.is_ascii_digit())
                .count();
            let phone_number = if digits == 10 {
                normalize_phone(&input.phone_number)
            } else {
                input.phone_number.trim().to_string()
            };

            conn.execute(
                "INSERT INTO emergency_contacts
                    (id, user_id, name, relationship, phone_number, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    owner_id,
                    input.name,
                    input.relationship,
                    phone_number,
                    format_datetime(&now),
                ],
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, relationship, phone_number, created_at
                 FROM emergency_contacts
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![id])?;
            let contact = match rows.next()? {
                Some(row) => row_to_contact(row)?,
                None => return Err(anyhow!("Contact not found after insert")),
            };

            Ok(contact)
        })
        .await
    }

    pub async fn delete_contact(&self, owner_id: &str, contact_id: &str) -> Result<bool> {
        let owner_id = owner_id.to_string();
        let contact_id = contact_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM emergency_contacts WHERE id = ?1 AND user_id = ?2",
                params![contact_id, owner_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[async_trait]
impl RecordStore<Contact> for Database {
    async fn list(&self, owner: &OwnerId) -> error::Result<Vec<Contact>> {
        Ok(self.list_contacts(owner.as_str()).await?)
    }

    async fn create(&self, owner: &OwnerId, input: ContactInput) -> error::Result<Contact> {
        input.validate()?;
        Ok(self.insert_contact(owner.as_str(), input).await?)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> error::Result<()> {
        if !self.delete_contact(owner.as_str(), id).await? {
            log_debug!("No contact {id} for {owner}; nothing to delete");
        }
        Ok(())
    }
}

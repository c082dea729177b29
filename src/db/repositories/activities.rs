use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    db::{
        connection::Database,
        helpers::{format_datetime, parse_datetime},
        models::{Activity, ActivityInput},
    },
    error,
    identity::OwnerId,
    log_debug,
    records::{RecordInput, RecordStore},
};

use super::sql_limit;

const ENABLE_LOGS: bool = true;

fn row_to_activity(row: &Row) -> Result<Activity> {
    let completed_at: String = row.get("completed_at")?;
    let created_at: String = row.get("created_at")?;

    Ok(Activity {
        id: row.get("id")?,
        owner_id: row.get("user_id")?,
        activity_type: row.get("activity_type")?,
        description: row.get("description")?,
        completed_at: parse_datetime(&completed_at, "completed_at")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// The owner's activities, most recently completed first.
    pub async fn list_activities(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Activity>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, activity_type, description, completed_at, created_at
                 FROM daily_activities
                 WHERE user_id = ?1
                 ORDER BY completed_at DESC, rowid DESC
                 LIMIT ?2",
            )?;

            let mut rows = stmt.query(params![owner_id, sql_limit(limit)])?;
            let mut activities = Vec::new();
            while let Some(row) = rows.next()? {
                activities.push(row_to_activity(row)?);
            }

            Ok(activities)
        })
        .await
    }

    /// Inserts the activity and returns the stored row.
    pub async fn insert_activity(&self, owner_id: &str, input: ActivityInput) -> Result<Activity> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            let now = Utc::now();

            conn.execute(
                "INSERT INTO daily_activities
                    (id, user_id, activity_type, description, completed_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    owner_id,
                    input.activity_type,
                    input.description,
                    format_datetime(&input.completed_at),
                    format_datetime(&now),
                ],
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, activity_type, description, completed_at, created_at
                 FROM daily_activities
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![id])?;
            let activity = match rows.next()? {
                Some(row) => row_to_activity(row)?,
                None => return Err(anyhow!("Activity not found after insert")),
            };

            Ok(activity)
        })
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_activity(&self, owner_id: &str, activity_id: &str) -> Result<bool> {
        let owner_id = owner_id.to_string();
        let activity_id = activity_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM daily_activities WHERE id = ?1 AND user_id = ?2",
                params![activity_id, owner_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[async_trait]
impl RecordStore<Activity> for Database {
    async fn list(&self, owner: &OwnerId) -> error::Result<Vec<Activity>> {
        Ok(self.list_activities(owner.as_str(), None).await?)
    }

    async fn create(&self, owner: &OwnerId, input: ActivityInput) -> error::Result<Activity> {
        input.validate()?;
        Ok(self.insert_activity(owner.as_str(), input).await?)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> error::Result<()> {
        if !self.delete_activity(owner.as_str(), id).await? {
            log_debug!("No activity {id} for {owner}; nothing to delete");
        }
        Ok(())
    }
}

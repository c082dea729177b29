//! In-process stores and a daylight-saving time zone for exercising forms
//! and screens without SQLite or the host's zone settings.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

use crate::{
    db::models::{Activity, ActivityInput},
    error::{Result, StoreError},
    identity::OwnerId,
    records::{RecordInput, RecordStore},
};

/// Activity store backed by a vector. Flip `fail` to simulate an outage,
/// `fail_list` to break only fetches, `hang` to make writes never finish.
#[derive(Default)]
pub struct MemoryActivities {
    rows: Mutex<Vec<Activity>>,
    next_id: AtomicUsize,
    pub fail: AtomicBool,
    pub fail_list: AtomicBool,
    pub hang: AtomicBool,
    pub creates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl MemoryActivities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn seed(&self, owner: &str, kind: &str, description: &str, at: DateTime<Utc>) -> Activity {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let activity = Activity {
            id: format!("seed-{id}"),
            owner_id: owner.to_string(),
            activity_type: kind.to_string(),
            description: description.to_string(),
            completed_at: at,
            created_at: at,
        };
        self.rows.lock().unwrap().push(activity.clone());
        activity
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    async fn stall(&self) {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".into()).into())
        } else {
            Ok(())
        }
    }
}

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

#[async_trait]
impl RecordStore<Activity> for MemoryActivities {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Activity>> {
        self.check()?;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("list offline".into()).into());
        }
        let mut rows: Vec<Activity> = self
            .rows
            .lock()
            .map_err(|_| anyhow!("rows lock poisoned"))?
            .iter()
            .filter(|row| row.owner_id == owner.as_str())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(rows)
    }

    async fn create(&self, owner: &OwnerId, input: ActivityInput) -> Result<Activity> {
        input.validate()?;
        self.check()?;
        self.stall().await;
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let activity = Activity {
            id: format!("act-{id}"),
            owner_id: owner.to_string(),
            activity_type: input.activity_type,
            description: input.description,
            completed_at: input.completed_at,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(activity.clone());
        Ok(activity)
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()> {
        self.check()?;
        self.stall().await;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !(row.id == id && row.owner_id == owner.as_str()));
        Ok(())
    }
}

/// US Eastern time for 2024 only: EDT from 2024-03-10 07:00Z until
/// 2024-11-03 06:00Z, EST otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eastern2024;

impl Eastern2024 {
    fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn edt() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }
}

impl TimeZone for Eastern2024 {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        Eastern2024
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let fits = |offset: FixedOffset| {
            let utc = *local - chrono::Duration::seconds(offset.local_minus_utc().into());
            self.offset_from_utc_datetime(&utc) == offset
        };
        match (fits(Self::edt()), fits(Self::est())) {
            (true, true) => LocalResult::Ambiguous(Self::edt(), Self::est()),
            (true, false) => LocalResult::Single(Self::edt()),
            (false, true) => LocalResult::Single(Self::est()),
            (false, false) => LocalResult::None,
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        let starts = at("2024-03-10T07:00:00Z").naive_utc();
        let ends = at("2024-11-03T06:00:00Z").naive_utc();
        if (starts..ends).contains(utc) {
            Self::edt()
        } else {
            Self::est()
        }
    }
}

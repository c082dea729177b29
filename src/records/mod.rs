//! The shape every listed entity shares, the store seam, and the in-memory
//! filter/group pipeline that turns a fetched list into day buckets.

pub mod filter;
pub mod grouping;
pub mod list;
pub mod window;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Result, error::ValidationError, identity::OwnerId};

pub use filter::{filter_records, RecordFilter};
pub use grouping::{day_label, group_by_day, DayGroup};
pub use list::RecordList;
pub use window::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Activity,
    Medication,
    Appointment,
    Contact,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Activity => "daily_activities",
            RecordKind::Medication => "medications",
            RecordKind::Appointment => "appointments",
            RecordKind::Contact => "emergency_contacts",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            RecordKind::Activity => "activity",
            RecordKind::Medication => "medication",
            RecordKind::Appointment => "appointment",
            RecordKind::Contact => "contact",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Activity => "activities",
            RecordKind::Medication => "medications",
            RecordKind::Appointment => "appointments",
            RecordKind::Contact => "contacts",
        }
    }
}

/// Common read surface of a stored row.
///
/// `id` is assigned by the store and never changes; `owner_id` is fixed at
/// creation. Records are created or deleted, never edited.
pub trait Record: Clone + Send + Sync + 'static {
    type Input: RecordInput;

    const KIND: RecordKind;

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
    fn category(&self) -> &str;
    fn description(&self) -> &str;
    /// The moment the record is about; lists are ordered on this, newest first.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// User-supplied fields for a new record.
pub trait RecordInput: Clone + Send + Sync + 'static {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Owner-scoped access to one table.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// All of the owner's rows, `timestamp` descending.
    async fn list(&self, owner: &OwnerId) -> Result<Vec<R>>;

    /// Validates `input`, inserts it and returns the stored row with its new id.
    async fn create(&self, owner: &OwnerId, input: R::Input) -> Result<R>;

    /// Removes the row if the owner has one with this id. Deleting something
    /// that isn't there is not an error.
    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()>;
}

#[async_trait]
impl<R, S> RecordStore<R> for &S
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    async fn list(&self, owner: &OwnerId) -> Result<Vec<R>> {
        (**self).list(owner).await
    }

    async fn create(&self, owner: &OwnerId, input: R::Input) -> Result<R> {
        (**self).create(owner, input).await
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()> {
        (**self).delete(owner, id).await
    }
}

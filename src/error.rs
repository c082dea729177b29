//! Error taxonomy shared by the store adapter, the form controller and the
//! presentation shell.
//!
//! The SQLite layer works in `anyhow::Result` and is wrapped into
//! [`StoreError::Backend`] at the record-store boundary, unless it already
//! carries a [`StoreError`] (a dead worker thread reports `Unavailable`).
//! Validation problems are caught before anything is sent to the store.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T, E = CareError> = std::result::Result<T, E>;

/// Bad or missing field data, detected before submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("'{value}' is not a valid choice for {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("{field} could not be read as a date: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    DateOutOfRange {
        field: &'static str,
        value: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
}

/// Network, auth or server failure while talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum CareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("another request is still in flight")]
    Busy,

    #[error("no signed-in owner; pass --owner or set CARELOG_OWNER")]
    NoOwner,

    #[error("nothing is waiting for confirmation")]
    NothingPending,
}

impl CareError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CareError::Validation(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, CareError::Store(_))
    }
}

/// Keeps an `Unavailable` raised inside the SQLite layer distinguishable from
/// any other backend failure.
impl From<anyhow::Error> for CareError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StoreError>() {
            Ok(store) => CareError::Store(store),
            Err(err) => CareError::Store(StoreError::Backend(err)),
        }
    }
}

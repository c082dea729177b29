//! Draft editing, submission and delete confirmation.
//!
//! Each field edit runs through the matching validation helper; an edit that
//! fails is dropped and the previous value stays. Submits and deletes refuse
//! to start while another request from the same form is still outstanding.

mod drafts;

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{
    error::{CareError, Result, ValidationError},
    identity::OwnerId,
    log_error, log_info,
    records::{Record, RecordInput, RecordList, RecordStore},
};

pub use drafts::{ActivityField, AppointmentField, ContactField, MedicationField};

const ENABLE_LOGS: bool = true;

/// The clock and zone that field edits are judged against.
#[derive(Debug, Clone)]
pub struct FieldContext<Tz: TimeZone = Local> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FieldContext<Tz> {
    pub fn new(now: &DateTime<Tz>) -> Self {
        Self { now: now.clone() }
    }

    pub fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Reads a wall-clock time typed by the user in this context's zone, with
    /// the offset in force on that date. Times skipped by a clock change have
    /// no reading; repeated times take the earlier one.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.now
            .timezone()
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A record input that can be edited field by field.
pub trait Draft: RecordInput {
    type Field: Copy + fmt::Debug + PartialEq;

    /// Defaults shown when the form opens.
    fn fresh<Tz: TimeZone>(ctx: &FieldContext<Tz>) -> Self;

    /// Applies `raw` to `field` if it passes that field's check. On error the
    /// draft keeps its previous value.
    fn apply<Tz: TimeZone>(
        &mut self,
        field: Self::Field,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> std::result::Result<(), ValidationError>;
}

/// Raises a busy flag and lowers it on drop, including when the request
/// future is dropped before it finishes.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Clone)]
pub struct FormController<D> {
    draft: D,
    open: bool,
    busy: bool,
}

impl<D: Draft> FormController<D> {
    pub fn new<Tz: TimeZone>(ctx: &FieldContext<Tz>) -> Self {
        Self {
            draft: D::fresh(ctx),
            open: false,
            busy: false,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the form and throws the draft away.
    pub fn cancel<Tz: TimeZone>(&mut self, ctx: &FieldContext<Tz>) {
        self.open = false;
        self.draft = D::fresh(ctx);
    }

    /// Edits are refused while a submit is in flight.
    pub fn edit<Tz: TimeZone>(
        &mut self,
        field: D::Field,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> Result<()> {
        if self.busy {
            return Err(CareError::Busy);
        }
        Ok(self.draft.apply(field, raw, ctx)?)
    }

    /// Creates the record, puts it at the top of `list`, closes the form and
    /// resets the draft. On failure the list is untouched and the form stays
    /// open with the draft intact.
    pub async fn submit<R, S, Tz>(
        &mut self,
        store: &S,
        owner: &OwnerId,
        list: &mut RecordList<R>,
        ctx: &FieldContext<Tz>,
    ) -> Result<R>
    where
        R: Record<Input = D>,
        S: RecordStore<R> + ?Sized,
        Tz: TimeZone,
    {
        if self.busy {
            return Err(CareError::Busy);
        }
        self.draft.validate()?;

        let result = {
            let _in_flight = InFlight::start(&mut self.busy);
            store.create(owner, self.draft.clone()).await
        };

        match result {
            Ok(record) => {
                log_info!("Added {} {}", R::KIND.singular(), record.id());
                list.prepend(record.clone());
                self.open = false;
                self.draft = D::fresh(ctx);
                Ok(record)
            }
            Err(err) => {
                log_error!("Error adding {}: {err}", R::KIND.singular());
                Err(err)
            }
        }
    }
}

/// Yes/no step in front of every delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmation {
    pending: Option<String>,
    busy: bool,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks for confirmation; replaces any earlier unanswered request.
    pub fn request(&mut self, id: impl Into<String>) {
        if !self.busy {
            self.pending = Some(id.into());
        }
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// "No": nothing changes.
    pub fn decline(&mut self) {
        self.pending = None;
    }

    /// "Yes": deletes the pending id and drops it from `list`. Returns the id.
    pub async fn confirm<R, S>(
        &mut self,
        store: &S,
        owner: &OwnerId,
        list: &mut RecordList<R>,
    ) -> Result<String>
    where
        R: Record,
        S: RecordStore<R> + ?Sized,
    {
        if self.busy {
            return Err(CareError::Busy);
        }
        let id = self.pending.take().ok_or(CareError::NothingPending)?;

        let result = {
            let _in_flight = InFlight::start(&mut self.busy);
            store.delete(owner, &id).await
        };

        match result {
            Ok(()) => {
                list.remove(&id);
                log_info!("Deleted {} {id}", R::KIND.singular());
                Ok(id)
            }
            Err(err) => {
                log_error!("Error deleting {} {id}: {err}", R::KIND.singular());
                Err(err)
            }
        }
    }
}

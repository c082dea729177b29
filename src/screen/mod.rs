//! Per-entity list screen: owns the session's record list and turns it into
//! something to render.
//!
//! Data flow: `load` fetches through the store, `view` runs the filter and
//! grouping over the in-memory list, and the form / delete paths write back
//! through the store and patch the list in place.

pub mod render;

use chrono::{DateTime, TimeZone};

use crate::{
    error::Result,
    forms::{DeleteConfirmation, Draft, FieldContext, FormController},
    identity::OwnerId,
    log_error, log_info,
    records::{
        filter_records, group_by_day, DayGroup, Record, RecordFilter, RecordList, RecordStore,
        TimeWindow,
    },
};

const ENABLE_LOGS: bool = true;

/// What the list area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView<'a, R> {
    Loading,
    /// The owner has no records of this kind at all.
    Empty,
    /// Records exist but the current search or window hides all of them.
    NoMatches,
    Grouped(Vec<DayGroup<'a, R>>),
}

pub struct RecordsScreen<R, S>
where
    R: Record,
    R::Input: Draft,
{
    store: S,
    owner: OwnerId,
    list: RecordList<R>,
    filter: RecordFilter,
    form: FormController<R::Input>,
    deletion: DeleteConfirmation,
    refetch_after_write: bool,
    last_error: Option<String>,
}

impl<R, S> RecordsScreen<R, S>
where
    R: Record,
    R::Input: Draft,
    S: RecordStore<R>,
{
    pub fn new<Tz: TimeZone>(store: S, owner: OwnerId, ctx: &FieldContext<Tz>) -> Self {
        Self {
            store,
            owner,
            list: RecordList::new(),
            filter: RecordFilter::default(),
            form: FormController::new(ctx),
            deletion: DeleteConfirmation::new(),
            refetch_after_write: false,
            last_error: None,
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Re-fetch after every successful create or delete instead of trusting
    /// the optimistic local update.
    pub fn with_refetch_after_write(mut self, enabled: bool) -> Self {
        self.refetch_after_write = enabled;
        self
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn list(&self) -> &RecordList<R> {
        &self.list
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn form(&self) -> &FormController<R::Input> {
        &self.form
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.deletion.pending()
    }

    /// Message for the most recent failed store call, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Initial fetch. A failure leaves the list as it was with loading cleared.
    pub async fn load(&mut self) -> Result<()> {
        self.list.begin_loading();
        match self.store.list(&self.owner).await {
            Ok(records) => {
                log_info!(
                    "Loaded {} {} for {}",
                    records.len(),
                    R::KIND.plural(),
                    self.owner
                );
                self.list.finish_loading(records);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                log_error!("Error fetching {}: {err}", R::KIND.plural());
                self.list.fail_loading();
                self.last_error = Some(format!("Could not load {}: {err}", R::KIND.plural()));
                Err(err)
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        self.filter.window = window;
    }

    pub fn view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ScreenView<'_, R> {
        if self.list.is_loading() {
            return ScreenView::Loading;
        }
        let visible = filter_records(self.list.records(), &self.filter, now);
        if visible.is_empty() {
            // Any active filter gets the "nothing matches" message, even when
            // the list itself is empty.
            return if self.filter.is_narrowing() {
                ScreenView::NoMatches
            } else {
                ScreenView::Empty
            };
        }
        ScreenView::Grouped(group_by_day(visible, now))
    }

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn cancel_form<Tz: TimeZone>(&mut self, ctx: &FieldContext<Tz>) {
        self.form.cancel(ctx);
    }

    pub fn edit<Tz: TimeZone>(
        &mut self,
        field: <R::Input as Draft>::Field,
        raw: &str,
        ctx: &FieldContext<Tz>,
    ) -> Result<()> {
        self.form.edit(field, raw, ctx)
    }

    pub async fn submit<Tz: TimeZone>(&mut self, ctx: &FieldContext<Tz>) -> Result<R> {
        let result = self
            .form
            .submit(&self.store, &self.owner, &mut self.list, ctx)
            .await;
        self.after_write(&result).await;
        result
    }

    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.deletion.request(id);
    }

    pub fn decline_delete(&mut self) {
        self.deletion.decline();
    }

    pub async fn confirm_delete(&mut self) -> Result<String> {
        let result = self
            .deletion
            .confirm(&self.store, &self.owner, &mut self.list)
            .await;
        self.after_write(&result).await;
        result
    }

    async fn after_write<T>(&mut self, result: &Result<T>) {
        match result {
            Ok(_) => {
                self.last_error = None;
                if self.refetch_after_write {
                    // The local update stays; a failed re-fetch only sets
                    // `last_error`.
                    let _ = self.load().await;
                }
            }
            Err(err) if err.is_store() => {
                self.last_error = Some(err.to_string());
            }
            Err(_) => {}
        }
    }
}

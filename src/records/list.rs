use super::Record;

/// The session's in-memory copy of one table, newest first.
///
/// Only three things change it: a finished load, a successful create
/// (prepended) and a successful delete (removed). Nothing is cached across
/// sessions.
#[derive(Debug, Clone)]
pub struct RecordList<R> {
    records: Vec<R>,
    loading: bool,
}

impl<R> Default for RecordList<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RecordList<R> {
    /// Starts in the loading state; nothing has been fetched yet.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn finish_loading(&mut self, records: Vec<R>) {
        self.records = records;
        self.loading = false;
    }

    /// Clears the loading flag and leaves whatever was there before, which on
    /// first load is nothing.
    pub fn fail_loading(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record> RecordList<R> {
    pub fn prepend(&mut self, record: R) {
        self.records.insert(0, record);
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        self.records.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

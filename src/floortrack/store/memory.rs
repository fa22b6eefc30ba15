use super::LedgerStore;
use crate::error::{Result, TrackError};
use crate::model::{LedgerRow, LocationEntry, LogEntry};
use chrono::NaiveDate;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    ledger: Vec<LedgerRow>,
    log: Vec<LogEntry>,
    locations: Vec<LocationEntry>,
    day_rows: HashMap<(String, NaiveDate), Vec<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_rows(&self, category: &str, date: NaiveDate) -> &[String] {
        self.day_rows
            .get(&(category.to_string(), date))
            .map(|rows| rows.as_slice())
            .unwrap_or(&[])
    }
}

impl LedgerStore for InMemoryStore {
    fn load_ledger(&self) -> Result<Vec<LedgerRow>> {
        Ok(self.ledger.clone())
    }

    fn save_ledger(&mut self, rows: &[LedgerRow]) -> Result<()> {
        self.ledger = rows.to_vec();
        Ok(())
    }

    fn append_log(&mut self, entries: &[LogEntry]) -> Result<()> {
        self.log.extend_from_slice(entries);
        Ok(())
    }

    fn load_log(&self) -> Result<Vec<LogEntry>> {
        Ok(self.log.clone())
    }

    fn load_locations(&self) -> Result<Vec<LocationEntry>> {
        Ok(self.locations.clone())
    }

    fn save_locations(&mut self, entries: &[LocationEntry]) -> Result<()> {
        self.locations = entries.to_vec();
        Ok(())
    }

    fn append_day_row(&mut self, category: &str, date: NaiveDate, row: &str) -> Result<()> {
        let rows = self
            .day_rows
            .entry((category.to_string(), date))
            .or_default();
        if rows.iter().any(|existing| existing == row) {
            return Err(TrackError::DuplicateRecord(row.to_string()));
        }
        rows.push(row.to_string());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::ItemRecord;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_ledger_row(mut self, key: &str, cage_no: &str, date: NaiveDate) -> Self {
            let fields = format!("{},A,B,Desc,E2", key)
                .split(',')
                .map(|f| f.to_string())
                .collect();
            let row = LedgerRow::new(ItemRecord::from_fields(fields), cage_no, date);
            let mut ledger = self.store.load_ledger().unwrap();
            ledger.push(row);
            self.store.save_ledger(&ledger).unwrap();
            self
        }

        pub fn with_location(mut self, location: &str, cage_no: &str) -> Self {
            let mut locations = self.store.load_locations().unwrap();
            locations.push(LocationEntry::new(location, cage_no));
            self.store.save_locations(&locations).unwrap();
            self
        }
    }
}

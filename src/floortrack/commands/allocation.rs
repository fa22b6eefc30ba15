use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackError};
use crate::model::{ItemKey, ItemRecord, LedgerRow, LogEntry, Operation};
use crate::payload::normalize_storage_row;
use crate::store::LedgerStore;
use chrono::NaiveDate;

/// Normalize a duct scan and add it to the in-progress batch. Rescanning a
/// label already in the batch is a duplicate.
pub fn collect_item(collected: &mut Vec<ItemRecord>, body: &str) -> Result<CmdResult> {
    let item = normalize_storage_row(body)?;
    if collected.iter().any(|existing| existing == &item) {
        return Err(TrackError::DuplicateScan);
    }
    let line = item.joined();
    collected.push(item);
    Ok(CmdResult::default()
        .with_display_line(line)
        .with_message(CmdMessage::success(
            "A duct QR has been scanned successfully",
        )))
}

/// Commit a collected batch under one cage. All-or-nothing: every key is
/// validated against the ledger (and within the batch) before any row is
/// written, then one ledger rewrite and one log append cover the whole batch.
pub fn commit_batch<S: LedgerStore>(
    store: &mut S,
    collected: &[ItemRecord],
    cage_no: &str,
    date: NaiveDate,
) -> Result<CmdResult> {
    let mut ledger = store.load_ledger()?;
    validate_keys(&ledger, collected)?;

    let rows: Vec<LedgerRow> = collected
        .iter()
        .map(|item| LedgerRow::new(item.clone(), cage_no, date))
        .collect();
    let entries: Vec<LogEntry> = rows
        .iter()
        .map(|row| LogEntry::new(row.clone(), Operation::Storaged))
        .collect();

    ledger.extend(rows.iter().cloned());
    store.save_ledger(&ledger)?;
    store.append_log(&entries)?;

    let mut result = CmdResult::default();
    for row in &rows {
        result.display_lines.push(row.display_line());
    }
    result.add_message(CmdMessage::success(
        "All labels have been written into storage",
    ));
    Ok(result)
}

/// Assign a cage to a location and commit whatever the session collected so
/// far. The location is checked first so a bad location scan leaves both the
/// table and the batch untouched.
pub fn allocate_and_commit<S: LedgerStore>(
    store: &mut S,
    cage_no: &str,
    location: &str,
    collected: &[ItemRecord],
    date: NaiveDate,
) -> Result<CmdResult> {
    let mut locations = store.load_locations()?;
    let entry = locations
        .iter_mut()
        .find(|entry| entry.location == location)
        .ok_or_else(|| TrackError::LocationNotFound(location.to_string()))?;
    entry.cage_no = cage_no.to_string();

    // Validate the batch before touching either file.
    let ledger = store.load_ledger()?;
    validate_keys(&ledger, collected)?;

    store.save_locations(&locations)?;

    let mut result = if collected.is_empty() {
        CmdResult::default()
    } else {
        commit_batch(store, collected, cage_no, date)?
    };
    result.add_message(CmdMessage::success("Cage allocated successfully"));
    Ok(result)
}

fn validate_keys(ledger: &[LedgerRow], collected: &[ItemRecord]) -> Result<()> {
    let mut batch_keys: Vec<ItemKey> = Vec::with_capacity(collected.len());
    for item in collected {
        let key = item.key();
        if ledger.iter().any(|row| row.key() == key) || batch_keys.contains(&key) {
            return Err(TrackError::DuplicateRecord(key.to_string()));
        }
        batch_keys.push(key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn duct(n: u32) -> String {
        format!("{},22,NC5,A,B,Desc,E1,E2,x,y", n)
    }

    #[test]
    fn collects_and_rejects_batch_duplicates() {
        let mut collected = Vec::new();
        collect_item(&mut collected, &duct(101)).unwrap();
        collect_item(&mut collected, &duct(102)).unwrap();
        let err = collect_item(&mut collected, &duct(101)).unwrap_err();
        assert!(matches!(err, TrackError::DuplicateScan));
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn batch_commit_writes_n_rows_and_n_log_entries() {
        let mut store = InMemoryStore::new();
        let mut collected = Vec::new();
        for n in [101, 102, 103] {
            collect_item(&mut collected, &duct(n)).unwrap();
        }

        commit_batch(&mut store, &collected, "45", date()).unwrap();

        let ledger = store.load_ledger().unwrap();
        let log = store.load_log().unwrap();
        assert_eq!(ledger.len(), 3);
        assert_eq!(log.len(), 3);
        assert!(ledger.iter().all(|row| row.cage_no == "45"));
        assert!(ledger.iter().all(|row| row.date_stored == date()));
        assert!(log.iter().all(|e| e.operation == Operation::Storaged));
    }

    #[test]
    fn batch_commit_is_all_or_nothing() {
        let mut store = StoreFixture::new()
            .with_ledger_row("102,22,NC5", "7", date())
            .store;
        let mut collected = Vec::new();
        collect_item(&mut collected, &duct(101)).unwrap();
        collect_item(&mut collected, &duct(102)).unwrap();

        let err = commit_batch(&mut store, &collected, "45", date()).unwrap_err();
        assert!(matches!(err, TrackError::DuplicateRecord(_)));
        assert_eq!(store.load_ledger().unwrap().len(), 1);
        assert!(store.load_log().unwrap().is_empty());
    }

    #[test]
    fn allocation_assigns_location_and_commits_batch() {
        let mut store = StoreFixture::new().with_location("12-A-B", "0").store;
        let mut collected = Vec::new();
        collect_item(&mut collected, &duct(101)).unwrap();

        allocate_and_commit(&mut store, "45", "12-A-B", &collected, date()).unwrap();

        let locations = store.load_locations().unwrap();
        assert_eq!(locations[0].cage_no, "45");
        assert_eq!(store.load_ledger().unwrap().len(), 1);
        assert_eq!(store.load_log().unwrap().len(), 1);
    }

    #[test]
    fn unknown_location_leaves_everything_untouched() {
        let mut store = StoreFixture::new().with_location("12-A-B", "0").store;
        let mut collected = Vec::new();
        collect_item(&mut collected, &duct(101)).unwrap();

        let err =
            allocate_and_commit(&mut store, "45", "99-Z-Z", &collected, date()).unwrap_err();
        assert!(matches!(err, TrackError::LocationNotFound(_)));
        assert_eq!(store.load_locations().unwrap()[0].cage_no, "0");
        assert!(store.load_ledger().unwrap().is_empty());
    }
}

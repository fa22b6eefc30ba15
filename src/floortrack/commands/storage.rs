use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackError};
use crate::model::{ItemRecord, LedgerRow, LogEntry, Operation};
use crate::store::LedgerStore;
use chrono::NaiveDate;

/// Commit a single pending item under the given cage number.
///
/// The ledger rewrite and the `Storaged` log append happen in the same
/// logical step; the composite key must not already be in storage.
pub fn commit_item<S: LedgerStore>(
    store: &mut S,
    item: ItemRecord,
    cage_no: &str,
    date: NaiveDate,
) -> Result<CmdResult> {
    let mut ledger = store.load_ledger()?;
    let key = item.key();
    if ledger.iter().any(|row| row.key() == key) {
        return Err(TrackError::DuplicateRecord(key.to_string()));
    }

    let row = LedgerRow::new(item, cage_no, date);
    ledger.push(row.clone());
    store.save_ledger(&ledger)?;
    store.append_log(&[LogEntry::new(row.clone(), Operation::Storaged)])?;

    Ok(CmdResult::default()
        .with_display_line(row.display_line())
        .with_message(CmdMessage::success("Cage processed successfully.")))
}

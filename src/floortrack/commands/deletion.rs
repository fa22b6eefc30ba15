use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackError};
use crate::model::{ItemKey, LedgerRow, LogEntry, Operation};
use crate::store::LedgerStore;
use chrono::NaiveDate;

/// Remove an item from storage by its composite key and log the delivery.
///
/// The first three comma-separated fields of the payload form the key; the
/// first ledger row matching it wins. The ledger rewrite comes before the log
/// append, so a failed rewrite never leaves an orphaned `Delivered` entry for
/// a row still in the ledger.
pub fn run<S: LedgerStore>(store: &mut S, body: &str, date: NaiveDate) -> Result<CmdResult> {
    let key = extract_key(body)?;
    let mut ledger = store.load_ledger()?;
    let pos = ledger
        .iter()
        .position(|row| row.key() == key)
        .ok_or_else(|| TrackError::RecordNotFound(key.to_string()))?;

    let removed = ledger.remove(pos);
    store.save_ledger(&ledger)?;

    // The delivery is logged under the deletion date, not the stored one.
    let delivered = LedgerRow::new(removed.item, removed.cage_no, date);
    store.append_log(&[LogEntry::new(delivered.clone(), Operation::Delivered)])?;

    Ok(CmdResult::default()
        .with_display_line(delivered.display_line())
        .with_message(CmdMessage::success("Data processed successfully.")))
}

fn extract_key(body: &str) -> Result<ItemKey> {
    let mut fields = body.split(',').map(str::trim);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), Some(c)) => {
            Ok(ItemKey(a.to_string(), b.to_string(), c.to_string()))
        }
        _ => Err(TrackError::MalformedPayload(
            "deletion needs the first three fields of the label".to_string(),
        )),
    }
}

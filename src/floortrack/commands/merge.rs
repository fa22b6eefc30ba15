use crate::commands::{CmdMessage, CmdResult, TrackerPaths};
use crate::error::{Result, TrackError};
use crate::store::fs::{FileStore, LEDGER_HEADER};
use crate::store::LedgerStore;
use std::fmt::Display;
use std::path::Path;

/// Left-join the storage ledger with the location table on `CageNo` and
/// write the joined table. A cage occupying several locations yields one
/// output row per location; a cage with none gets an empty `Location`.
pub fn run(paths: &TrackerPaths, output: &Path) -> Result<CmdResult> {
    let store = FileStore::new(paths.clone());
    let ledger = store.load_ledger()?;
    let locations = store.load_locations()?;

    let persist = |e: &dyn Display| TrackError::Persistence(format!("{}: {}", output.display(), e));

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .map_err(|e| persist(&e))?;

    let mut header: Vec<&str> = LEDGER_HEADER.to_vec();
    header.push("Location");
    wtr.write_record(&header).map_err(|e| persist(&e))?;

    let mut written = 0usize;
    for row in &ledger {
        let matches: Vec<&str> = locations
            .iter()
            .filter(|entry| entry.cage_no == row.cage_no)
            .map(|entry| entry.location.as_str())
            .collect();

        let base = row.display_line();
        if matches.is_empty() {
            let mut rec: Vec<String> = base.split(',').map(str::to_string).collect();
            rec.push(String::new());
            wtr.write_record(&rec).map_err(|e| persist(&e))?;
            written += 1;
        } else {
            for location in matches {
                let mut rec: Vec<String> = base.split(',').map(str::to_string).collect();
                rec.push(location.to_string());
                wtr.write_record(&rec).map_err(|e| persist(&e))?;
                written += 1;
            }
        }
    }
    wtr.flush().map_err(|e| persist(&e))?;

    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Merged {} row(s) into {}",
        written,
        output.display()
    ))))
}

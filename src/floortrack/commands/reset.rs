use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackError};
use crate::model::EMPTY_CAGE;
use crate::store::LedgerStore;

/// Mark a storage location as vacant again.
pub fn run<S: LedgerStore>(store: &mut S, location: &str) -> Result<CmdResult> {
    let mut locations = store.load_locations()?;
    let entry = locations
        .iter_mut()
        .find(|entry| entry.location == location)
        .ok_or_else(|| TrackError::LocationNotFound(location.to_string()))?;
    entry.cage_no = EMPTY_CAGE.to_string();
    store.save_locations(&locations)?;

    Ok(CmdResult::default().with_message(CmdMessage::success(
        "Location has been reset successfully",
    )))
}

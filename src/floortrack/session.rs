//! The scan-session state machine.
//!
//! One scan line is fully processed before the next is accepted. The session
//! is a plain value threaded through [`handle_scan`]; there are no ambient
//! globals, so flows are deterministic under test.
//!
//! | State | Input | Next |
//! |---|---|---|
//! | Idle | item record `" T"` | AwaitingCageCode |
//! | Idle | `<digits> T` | AwaitingAllocation |
//! | Idle | location code `" T"` | Idle (location reset) |
//! | Idle | `" D"` | Idle (deletion) |
//! | Idle | category letter | Idle (day-file routing) |
//! | AwaitingCageCode | digits | Idle (commit) |
//! | AwaitingCageCode | `exit` | Idle (discard) |
//! | AwaitingAllocation | duct scan `" T"` | AwaitingAllocation (collect) |
//! | AwaitingAllocation | location code `" T"` | Idle (allocate + commit) |
//! | AwaitingAllocation | `exit t` | Idle (commit batch, or discard if empty) |
//!
//! Anything else reports an error and leaves the state where the table says
//! it should be.

use crate::commands::{allocation, category, deletion, reset, storage};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::model::ItemRecord;
use crate::payload::{normalize_storage_row, Payload};
use crate::store::LedgerStore;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingCageCode {
        pending_item: ItemRecord,
    },
    AwaitingAllocation {
        cage_no: String,
        collected: Vec<ItemRecord>,
    },
}

/// Transient state of the single scanning station: the current workflow phase
/// plus the dedup guard over the last accepted line.
#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    last_scan: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }
}

/// Process one scan line against the current session.
///
/// Consecutive identical lines are rejected with `DuplicateScan` in every
/// state. The guard resets when a different line is accepted and clears on
/// any other error, so a failed label can be rescanned immediately.
pub fn handle_scan<S: LedgerStore>(
    session: &mut Session,
    store: &mut S,
    config: &TrackConfig,
    today: NaiveDate,
    line: &str,
) -> Result<CmdResult> {
    let line = line.trim();
    if session.last_scan.as_deref() == Some(line) {
        return Err(TrackError::DuplicateScan);
    }

    let outcome = dispatch(session, store, config, today, line);
    match &outcome {
        Ok(_) => session.last_scan = Some(line.to_string()),
        Err(TrackError::DuplicateScan) => {}
        Err(_) => session.last_scan = None,
    }
    outcome
}

fn dispatch<S: LedgerStore>(
    session: &mut Session,
    store: &mut S,
    config: &TrackConfig,
    today: NaiveDate,
    line: &str,
) -> Result<CmdResult> {
    match std::mem::take(&mut session.phase) {
        Phase::Idle => handle_idle(session, store, config, today, line),
        Phase::AwaitingCageCode { pending_item } => {
            handle_cage_code(session, store, pending_item, today, line)
        }
        Phase::AwaitingAllocation { cage_no, collected } => {
            handle_allocation(session, store, config, cage_no, collected, today, line)
        }
    }
}

fn handle_idle<S: LedgerStore>(
    session: &mut Session,
    store: &mut S,
    config: &TrackConfig,
    today: NaiveDate,
    line: &str,
) -> Result<CmdResult> {
    match Payload::classify(line, config) {
        Payload::CageDirect { cage_no } => {
            let message = format!(
                "Current cage is {}. Please scan a location code or a duct QR",
                cage_no
            );
            session.phase = Phase::AwaitingAllocation {
                cage_no,
                collected: Vec::new(),
            };
            Ok(CmdResult::default().with_message(CmdMessage::success(message)))
        }
        Payload::LocationTarget { location } => reset::run(store, &location),
        Payload::StorageStart { body } => {
            let pending_item = normalize_storage_row(&body)?;
            session.phase = Phase::AwaitingCageCode { pending_item };
            Ok(CmdResult::default().with_message(CmdMessage::success(
                "Please scan a cage code or type Exit to interrupt",
            )))
        }
        Payload::Deletion { body } => deletion::run(store, &body, today),
        Payload::CategoryItem { suffix, body } => {
            // classify() only returns suffixes present in the config
            let def = config
                .category(suffix)
                .ok_or(TrackError::InvalidCategory)?;
            category::run(store, def, &body, today)
        }
        Payload::Invalid => Err(TrackError::InvalidCategory),
    }
}

fn handle_cage_code<S: LedgerStore>(
    session: &mut Session,
    store: &mut S,
    pending_item: ItemRecord,
    today: NaiveDate,
    line: &str,
) -> Result<CmdResult> {
    if line.eq_ignore_ascii_case("exit") {
        return Ok(CmdResult::default().with_message(CmdMessage::info(
            "Storage process has been interrupted. Please continue scanning.",
        )));
    }
    if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
        return match storage::commit_item(store, pending_item.clone(), line, today) {
            Ok(result) => Ok(result),
            Err(e) => {
                session.phase = Phase::AwaitingCageCode { pending_item };
                Err(e)
            }
        };
    }
    session.phase = Phase::AwaitingCageCode { pending_item };
    Err(TrackError::InvalidCageCode(line.to_string()))
}

fn handle_allocation<S: LedgerStore>(
    session: &mut Session,
    store: &mut S,
    config: &TrackConfig,
    cage_no: String,
    collected: Vec<ItemRecord>,
    today: NaiveDate,
    line: &str,
) -> Result<CmdResult> {
    if line.eq_ignore_ascii_case("exit t") {
        if collected.is_empty() {
            return Ok(CmdResult::default()
                .with_message(CmdMessage::info("Allocation process interrupted")));
        }
        return match allocation::commit_batch(store, &collected, &cage_no, today) {
            Ok(result) => Ok(result),
            Err(e) => {
                session.phase = Phase::AwaitingAllocation { cage_no, collected };
                Err(e)
            }
        };
    }

    match Payload::classify(line, config) {
        Payload::LocationTarget { location } => {
            match allocation::allocate_and_commit(store, &cage_no, &location, &collected, today)
            {
                Ok(result) => Ok(result),
                Err(e) => {
                    session.phase = Phase::AwaitingAllocation { cage_no, collected };
                    Err(e)
                }
            }
        }
        Payload::StorageStart { body } | Payload::CageDirect { cage_no: body } => {
            let mut collected = collected;
            let outcome = allocation::collect_item(&mut collected, &body);
            session.phase = Phase::AwaitingAllocation { cage_no, collected };
            outcome
        }
        _ => {
            session.phase = Phase::AwaitingAllocation { cage_no, collected };
            Err(TrackError::MalformedPayload(
                "expected a duct QR, a location code, or 'exit t'".to_string(),
            ))
        }
    }
}

//! # API Facade
//!
//! The API layer is a **thin facade** over the session state machine and the
//! command layer. It is the single entry point for all floortrack
//! operations, regardless of the UI being used.
//!
//! The facade:
//! - **Holds** the scan [`Session`] for the lifetime of the process
//! - **Injects** the current date (tests pass their own through [`TrackerApi::scan_on`])
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It explicitly avoids business logic (that belongs in `session.rs` and
//! `commands/*.rs`), I/O formatting, and presentation concerns.
//!
//! `TrackerApi<S: LedgerStore>` is generic over the storage backend:
//! production wires a `FileStore`, tests an `InMemoryStore`.

use crate::commands::{self, CmdResult, TrackerPaths};
use crate::config::TrackConfig;
use crate::error::Result;
use crate::session::{Phase, Session};
use crate::store::LedgerStore;
use chrono::{Local, NaiveDate};
use std::path::Path;

pub struct TrackerApi<S: LedgerStore> {
    store: S,
    paths: TrackerPaths,
    config: TrackConfig,
    session: Session,
}

impl<S: LedgerStore> TrackerApi<S> {
    pub fn new(store: S, paths: TrackerPaths, config: TrackConfig) -> Self {
        Self {
            store,
            paths,
            config,
            session: Session::new(),
        }
    }

    /// Process one scan line, dated today.
    pub fn scan(&mut self, line: &str) -> Result<CmdResult> {
        self.scan_on(line, Local::now().date_naive())
    }

    /// Process one scan line with an explicit date.
    pub fn scan_on(&mut self, line: &str, date: NaiveDate) -> Result<CmdResult> {
        crate::session::handle_scan(&mut self.session, &mut self.store, &self.config, date, line)
    }

    /// The current workflow phase, for prompting.
    pub fn phase(&self) -> &Phase {
        self.session.phase()
    }

    /// Roll today's category day files into a summary file.
    pub fn summary(&self) -> Result<CmdResult> {
        commands::summary::run(&self.paths, &self.config, Local::now().date_naive())
    }

    /// Join the ledger with the location table into `output`.
    pub fn merge(&self, output: &Path) -> Result<CmdResult> {
        commands::merge::run(&self.paths, output)
    }

    /// Convert a historical file into SQL-loadable row files under `out_dir`.
    pub fn export(&self, file: &Path, out_dir: &Path) -> Result<CmdResult> {
        commands::export::run(file, out_dir)
    }
}

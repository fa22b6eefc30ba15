//! # Storage Layer
//!
//! This module defines the storage abstraction for floortrack. The
//! [`LedgerStore`] trait allows the session logic to work with different
//! storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Keep the state machine **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production CSV-file storage
//!   - Ledger, log, and location table under `Storage/`
//!   - Category day files under `<Category>/<DD-MM-YYYY>.csv`
//!   - Whole-file rewrites go through a tmp file + rename
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## Persistence Model
//!
//! The ledger and location table are small and rewritten whole on every
//! mutation (load, mutate, save) rather than updated row by row. The log and
//! the day files are append-only. This assumes a single scanning station per
//! data directory; the store is not safe for concurrent multi-process
//! writers.

use crate::error::Result;
use crate::model::{LedgerRow, LocationEntry, LogEntry};
use chrono::NaiveDate;

pub mod fs;
pub mod memory;

/// Abstract interface for the storage ledger, the audit log, the location
/// table, and the per-category day files.
pub trait LedgerStore {
    /// Load every row currently in storage. An absent ledger is empty.
    fn load_ledger(&self) -> Result<Vec<LedgerRow>>;

    /// Rewrite the ledger in full. Implementations must make the rewrite
    /// atomic or accept a torn file on crash.
    fn save_ledger(&mut self, rows: &[LedgerRow]) -> Result<()>;

    /// Append entries to the audit log. The log is append-only; entries are
    /// never rewritten or removed.
    fn append_log(&mut self, entries: &[LogEntry]) -> Result<()>;

    /// Read back the audit log.
    fn load_log(&self) -> Result<Vec<LogEntry>>;

    /// Load the location table. An absent table is empty.
    fn load_locations(&self) -> Result<Vec<LocationEntry>>;

    /// Rewrite the location table in full.
    fn save_locations(&mut self, entries: &[LocationEntry]) -> Result<()>;

    /// Append a normalized row to a category's day file, creating the file
    /// with its header if absent. Fails with `DuplicateRecord` when the file
    /// already contains the exact row text.
    fn append_day_row(&mut self, category: &str, date: NaiveDate, row: &str) -> Result<()>;
}

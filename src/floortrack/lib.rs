//! # Floortrack Architecture
//!
//! Floortrack is a **UI-agnostic scan-tracking library**. The binary that ships with it
//! is a thin stdin-driven client; the same core could sit behind a kiosk screen or a
//! small HTTP endpoint without changing a line of business logic.
//!
//! A handheld scanner on the shop floor emits one encoded text line per label. The
//! trailing suffix code of the line decides what happens: storage intake, cage
//! allocation, deletion from storage, or routing into a per-category day file.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, args.rs, wired by main.rs)                │
//! │  - Parses arguments, renders output, runs the stdin loop    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - TrackerApi facade holding the scan Session               │
//! │  - Injects "today", returns structured Result types         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session + Command Layer (session.rs, commands/*.rs)        │
//! │  - The scan state machine and per-workflow business logic   │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract LedgerStore trait                               │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, session, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - **Never** looks at the wall clock; the current date is always passed in
//!
//! Every outcome, success or failure, is surfaced as leveled messages plus the
//! display line(s) for the row just processed; the CLI decides how that looks.
//!
//! ## Testing Strategy
//!
//! 1. **Session + commands**: thorough unit tests against `InMemoryStore`, with the
//!    date injected so flows are deterministic. This is where the lion's share of
//!    testing lives.
//! 2. **Storage** (`store/fs.rs`): tempdir-backed tests for headers, atomic rewrites,
//!    and append-only log behavior.
//! 3. **CLI**: integration tests drive the binary with scan lines on stdin.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`session`]: The scan-session state machine
//! - [`commands`]: Business logic for each workflow, plus result types
//! - [`payload`]: Scan-line classification and row normalization
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`ItemRecord`, `LedgerRow`, `LogEntry`, ...)
//! - [`config`]: Category table and configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod session;
pub mod store;

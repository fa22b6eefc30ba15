use crate::model::DATE_FORMAT;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub mod allocation;
pub mod category;
pub mod deletion;
pub mod export;
pub mod merge;
pub mod reset;
pub mod storage;
pub mod summary;

/// Filesystem layout of a floortrack data directory.
///
/// The ledger, log, and location table live under `Storage/`; each routed
/// category keeps its day files in its own directory next to it.
#[derive(Debug, Clone)]
pub struct TrackerPaths {
    pub data_dir: PathBuf,
}

impl TrackerPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("Storage")
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.storage_dir().join("Storage.csv")
    }

    pub fn log_file(&self) -> PathBuf {
        self.storage_dir().join("Log.csv")
    }

    pub fn location_file(&self) -> PathBuf {
        self.storage_dir().join("Location.csv")
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.data_dir.join(category)
    }

    pub fn day_file(&self, category: &str, date: NaiveDate) -> PathBuf {
        self.category_dir(category)
            .join(format!("{}.csv", date.format(DATE_FORMAT)))
    }

    pub fn summary_file(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("{}.csv", date.format(DATE_FORMAT)))
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured outcome of one operation: leveled status messages plus the
/// display line(s) for whatever was just processed. The presentation layer
/// renders these; the core never formats for a screen.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub display_lines: Vec<String>,
    pub messages: Vec<CmdMessage>,
    /// Per-category totals, filled by the daily summary (`None` when a
    /// category produced no day file).
    pub totals: Vec<(String, Option<f64>)>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_display_line(mut self, line: impl Into<String>) -> Self {
        self.display_lines.push(line.into());
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}

pub(crate) fn file_date(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

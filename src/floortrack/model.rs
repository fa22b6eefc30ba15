use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar-date format used in every persisted file and display line.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Cage number meaning "no cage" in the location table and "unassigned" on a row.
pub const EMPTY_CAGE: &str = "0";

/// Composite identity of an item: its first three fields, trimmed.
///
/// No two ledger rows may share a key while the item is in storage; deletion
/// scans look rows up by this key as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey(pub String, pub String, pub String);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// The canonical persisted shape of an item, after the scan-time-only fields
/// have been stripped by the normalizer.
///
/// Canonically `Ref,ItemNo,NCNumber,Field1,Field2,Description,End1,End2`, but
/// labels in the wild carry 10 or 11 raw fields, so the normalized record is a
/// field list rather than a fixed tuple. The first three fields are the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    fields: Vec<String>,
}

impl ItemRecord {
    /// Build a record from already-normalized fields. Callers are expected to
    /// go through the payload normalizer, which guarantees at least the three
    /// key fields are present.
    pub fn from_fields(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn key(&self) -> ItemKey {
        ItemKey(
            self.fields.first().map(|f| f.trim().to_string()).unwrap_or_default(),
            self.fields.get(1).map(|f| f.trim().to_string()).unwrap_or_default(),
            self.fields.get(2).map(|f| f.trim().to_string()).unwrap_or_default(),
        )
    }

    /// The canonical comma-joined row text.
    pub fn joined(&self) -> String {
        self.fields.join(",")
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// An [`ItemRecord`] currently held in storage, bound to a cage and a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub item: ItemRecord,
    pub cage_no: String,
    pub date_stored: NaiveDate,
}

impl LedgerRow {
    pub fn new(item: ItemRecord, cage_no: impl Into<String>, date_stored: NaiveDate) -> Self {
        Self {
            item,
            cage_no: cage_no.into(),
            date_stored,
        }
    }

    pub fn key(&self) -> ItemKey {
        self.item.key()
    }

    /// The row as shown to the operator and written to disk.
    pub fn display_line(&self) -> String {
        format!(
            "{},{},{}",
            self.item.joined(),
            self.cage_no,
            self.date_stored.format(DATE_FORMAT)
        )
    }
}

/// Lifecycle transition recorded in the append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Storaged,
    Delivered,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Storaged => "Storaged",
            Operation::Delivered => "Delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Storaged" => Some(Operation::Storaged),
            "Delivered" => Some(Operation::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit-trail entry. Never mutated or removed once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub row: LedgerRow,
    pub operation: Operation,
}

impl LogEntry {
    pub fn new(row: LedgerRow, operation: Operation) -> Self {
        Self { row, operation }
    }
}

/// One row of the location table: a physical slot and the cage occupying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub location: String,
    pub cage_no: String,
}

impl LocationEntry {
    pub fn new(location: impl Into<String>, cage_no: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            cage_no: cage_no.into(),
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.cage_no == EMPTY_CAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> ItemRecord {
        ItemRecord::from_fields(fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn key_trims_fields() {
        let rec = record(&[" 101 ", "22", " NC5", "A", "B"]);
        assert_eq!(
            rec.key(),
            ItemKey("101".into(), "22".into(), "NC5".into())
        );
    }

    #[test]
    fn display_line_appends_cage_and_date() {
        let row = LedgerRow::new(
            record(&["101", "22", "NC5", "A", "B", "Desc", "E2"]),
            "45",
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        );
        assert_eq!(row.display_line(), "101,22,NC5,A,B,Desc,E2,45,07-03-2024");
    }

    #[test]
    fn vacant_location() {
        assert!(LocationEntry::new("12-A-B", "0").is_vacant());
        assert!(!LocationEntry::new("12-A-B", "45").is_vacant());
    }
}

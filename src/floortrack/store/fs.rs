use super::LedgerStore;
use crate::commands::TrackerPaths;
use crate::error::{Result, TrackError};
use crate::model::{ItemRecord, LedgerRow, LocationEntry, LogEntry, Operation, DATE_FORMAT};
use chrono::NaiveDate;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

pub const LEDGER_HEADER: [&str; 10] = [
    "Ref",
    "ItemNo",
    "NCNumber",
    "Field1",
    "Field2",
    "Description",
    "End1",
    "End2",
    "CageNo",
    "Date",
];

pub const LOG_HEADER: [&str; 11] = [
    "Ref",
    "ItemNo",
    "NCNumber",
    "Field1",
    "Field2",
    "Description",
    "End1",
    "End2",
    "CageNo",
    "Date",
    "Operation",
];

pub const LOCATION_HEADER: [&str; 2] = ["Location", "CageNo"];

pub const DAY_HEADER: [&str; 8] = [
    "Ref",
    "ItemNo",
    "NCNumber",
    "Field1",
    "Field2",
    "Description",
    "AreaMetal",
    "AreaInsulation",
];

/// Production store: CSV files under a data directory.
///
/// Item rows are flexible-width (7 or 8 fields depending on the label), so
/// every reader and writer here runs in flexible mode and addresses the cage,
/// date, and operation columns from the end of the record.
pub struct FileStore {
    paths: TrackerPaths,
}

impl FileStore {
    pub fn new(paths: TrackerPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }
}

fn persist_err(path: &Path, e: impl Display) -> TrackError {
    TrackError::Persistence(format!("{}: {}", path.display(), e))
}

fn encode_csv(path: &Path, header: &[&str], records: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    if !header.is_empty() {
        wtr.write_record(header).map_err(|e| persist_err(path, e))?;
    }
    for rec in records {
        wtr.write_record(rec).map_err(|e| persist_err(path, e))?;
    }
    wtr.into_inner().map_err(|e| persist_err(path, e.into_error()))
}

/// Rewrite a whole file through a tmp sibling + rename, so a crash mid-write
/// never leaves a torn file behind.
fn rewrite_csv(path: &Path, header: &[&str], records: &[Vec<String>]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| persist_err(path, "no parent directory"))?;
    fs::create_dir_all(parent).map_err(|e| persist_err(path, e))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| persist_err(path, "invalid file name"))?;
    let tmp = parent.join(format!(".{}.tmp", file_name));

    let data = encode_csv(path, header, records)?;
    fs::write(&tmp, data).map_err(|e| persist_err(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| persist_err(path, e))
}

fn append_csv(path: &Path, header: &[&str], records: &[Vec<String>]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| persist_err(path, "no parent directory"))?;
    fs::create_dir_all(parent).map_err(|e| persist_err(path, e))?;

    let head: &[&str] = if path.exists() { &[] } else { header };
    let data = encode_csv(path, head, records)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| persist_err(path, e))?;
    file.write_all(&data).map_err(|e| persist_err(path, e))
}

fn read_records(path: &Path) -> Result<Vec<csv::StringRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut records = Vec::new();
    for rec in rdr.records() {
        records.push(rec?);
    }
    Ok(records)
}

fn parse_date(path: &Path, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| persist_err(path, format!("bad date '{}': {}", s, e)))
}

fn parse_ledger_record(path: &Path, rec: &csv::StringRecord) -> Result<LedgerRow> {
    if rec.len() < 5 {
        return Err(persist_err(path, format!("short ledger row: {:?}", rec)));
    }
    let date = parse_date(path, rec.get(rec.len() - 1).unwrap_or_default())?;
    let cage_no = rec.get(rec.len() - 2).unwrap_or_default().trim().to_string();
    let fields = rec
        .iter()
        .take(rec.len() - 2)
        .map(|f| f.trim().to_string())
        .collect();
    Ok(LedgerRow::new(ItemRecord::from_fields(fields), cage_no, date))
}

fn ledger_record(row: &LedgerRow) -> Vec<String> {
    let mut rec: Vec<String> = row.item.fields().to_vec();
    rec.push(row.cage_no.clone());
    rec.push(row.date_stored.format(DATE_FORMAT).to_string());
    rec
}

impl LedgerStore for FileStore {
    fn load_ledger(&self) -> Result<Vec<LedgerRow>> {
        let path = self.paths.ledger_file();
        read_records(&path)?
            .iter()
            .map(|rec| parse_ledger_record(&path, rec))
            .collect()
    }

    fn save_ledger(&mut self, rows: &[LedgerRow]) -> Result<()> {
        let records: Vec<Vec<String>> = rows.iter().map(ledger_record).collect();
        rewrite_csv(&self.paths.ledger_file(), &LEDGER_HEADER, &records)
    }

    fn append_log(&mut self, entries: &[LogEntry]) -> Result<()> {
        let records: Vec<Vec<String>> = entries
            .iter()
            .map(|entry| {
                let mut rec = ledger_record(&entry.row);
                rec.push(entry.operation.as_str().to_string());
                rec
            })
            .collect();
        append_csv(&self.paths.log_file(), &LOG_HEADER, &records)
    }

    fn load_log(&self) -> Result<Vec<LogEntry>> {
        let path = self.paths.log_file();
        read_records(&path)?
            .iter()
            .map(|rec| {
                if rec.len() < 6 {
                    return Err(persist_err(&path, format!("short log row: {:?}", rec)));
                }
                let op_str = rec.get(rec.len() - 1).unwrap_or_default().trim();
                let operation = Operation::parse(op_str)
                    .ok_or_else(|| persist_err(&path, format!("bad operation '{}'", op_str)))?;
                let inner = csv::StringRecord::from(
                    rec.iter().take(rec.len() - 1).collect::<Vec<_>>(),
                );
                Ok(LogEntry::new(parse_ledger_record(&path, &inner)?, operation))
            })
            .collect()
    }

    fn load_locations(&self) -> Result<Vec<LocationEntry>> {
        let path = self.paths.location_file();
        read_records(&path)?
            .iter()
            .map(|rec| {
                if rec.len() < 2 {
                    return Err(persist_err(&path, format!("short location row: {:?}", rec)));
                }
                Ok(LocationEntry::new(
                    rec.get(0).unwrap_or_default().trim(),
                    rec.get(1).unwrap_or_default().trim(),
                ))
            })
            .collect()
    }

    fn save_locations(&mut self, entries: &[LocationEntry]) -> Result<()> {
        let records: Vec<Vec<String>> = entries
            .iter()
            .map(|e| vec![e.location.clone(), e.cage_no.clone()])
            .collect();
        rewrite_csv(&self.paths.location_file(), &LOCATION_HEADER, &records)
    }

    fn append_day_row(&mut self, category: &str, date: NaiveDate, row: &str) -> Result<()> {
        let path = self.paths.day_file(category, date);
        if path.exists() {
            let existing = fs::read_to_string(&path)?;
            if existing.lines().any(|line| line == row) {
                return Err(TrackError::DuplicateRecord(row.to_string()));
            }
        } else {
            let parent = path
                .parent()
                .ok_or_else(|| persist_err(&path, "no parent directory"))?;
            fs::create_dir_all(parent).map_err(|e| persist_err(&path, e))?;
            fs::write(&path, format!("{}\n", DAY_HEADER.join(",")))
                .map_err(|e| persist_err(&path, e))?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| persist_err(&path, e))?;
        writeln!(file, "{}", row).map_err(|e| persist_err(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operation;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(TrackerPaths::new(dir.path()));
        (dir, store)
    }

    fn row(key: &str, cage: &str) -> LedgerRow {
        let fields = format!("{},22,NC5,A,B,Desc,E2", key)
            .split(',')
            .map(|f| f.to_string())
            .collect();
        LedgerRow::new(
            ItemRecord::from_fields(fields),
            cage,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        )
    }

    #[test]
    fn missing_files_read_as_empty() {
        let (_dir, store) = setup();
        assert!(store.load_ledger().unwrap().is_empty());
        assert!(store.load_log().unwrap().is_empty());
        assert!(store.load_locations().unwrap().is_empty());
    }

    #[test]
    fn ledger_roundtrip_preserves_flexible_widths() {
        let (_dir, mut store) = setup();
        let seven = row("101", "45");
        let mut eight = row("102", "45");
        eight.item = ItemRecord::from_fields(
            "102,22,NC5,A,B,Desc,E2,F"
                .split(',')
                .map(|f| f.to_string())
                .collect(),
        );
        store.save_ledger(&[seven.clone(), eight.clone()]).unwrap();

        let loaded = store.load_ledger().unwrap();
        assert_eq!(loaded, vec![seven, eight]);
    }

    #[test]
    fn ledger_rewrite_writes_header_and_leaves_no_tmp() {
        let (dir, mut store) = setup();
        store.save_ledger(&[row("101", "45")]).unwrap();

        let content = fs::read_to_string(store.paths().ledger_file()).unwrap();
        assert!(content.starts_with(&LEDGER_HEADER.join(",")));

        for entry in fs::read_dir(dir.path().join("Storage")).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(
                !name.to_string_lossy().ends_with(".tmp"),
                "leftover tmp file: {:?}",
                name
            );
        }
    }

    #[test]
    fn log_appends_and_reads_back() {
        let (_dir, mut store) = setup();
        store
            .append_log(&[LogEntry::new(row("101", "45"), Operation::Storaged)])
            .unwrap();
        store
            .append_log(&[LogEntry::new(row("101", "45"), Operation::Delivered)])
            .unwrap();

        let content = fs::read_to_string(store.paths().log_file()).unwrap();
        assert!(content.starts_with(&LOG_HEADER.join(",")));

        let log = store.load_log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].operation, Operation::Storaged);
        assert_eq!(log[1].operation, Operation::Delivered);
        assert_eq!(log[0].row, row("101", "45"));
    }

    #[test]
    fn locations_roundtrip() {
        let (_dir, mut store) = setup();
        let entries = vec![
            LocationEntry::new("12-A-B", "45"),
            LocationEntry::new("13-A-C", "0"),
        ];
        store.save_locations(&entries).unwrap();
        assert_eq!(store.load_locations().unwrap(), entries);
    }

    #[test]
    fn day_file_created_with_header_and_dedups() {
        let (_dir, mut store) = setup();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        store
            .append_day_row("Laser Cutter", date, "r,i,n,f1,f2,d,1.5,0")
            .unwrap();

        let path = store.paths().day_file("Laser Cutter", date);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&DAY_HEADER.join(",")));
        assert!(content.contains("r,i,n,f1,f2,d,1.5,0"));

        let err = store
            .append_day_row("Laser Cutter", date, "r,i,n,f1,f2,d,1.5,0")
            .unwrap_err();
        assert!(matches!(err, TrackError::DuplicateRecord(_)));

        store
            .append_day_row("Laser Cutter", date, "r2,i,n,f1,f2,d,2.5,0")
            .unwrap();
    }
}

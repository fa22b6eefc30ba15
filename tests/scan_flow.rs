//! End-to-end session flows against the real file store.

use chrono::NaiveDate;
use floortrack::api::TrackerApi;
use floortrack::commands::TrackerPaths;
use floortrack::config::TrackConfig;
use floortrack::error::TrackError;
use floortrack::model::LocationEntry;
use floortrack::store::fs::FileStore;
use floortrack::store::LedgerStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, TrackerApi<FileStore>) {
    let dir = TempDir::new().unwrap();
    let paths = TrackerPaths::new(dir.path());
    let api = TrackerApi::new(
        FileStore::new(paths.clone()),
        paths,
        TrackConfig::default(),
    );
    (dir, api)
}

fn store_for(dir: &TempDir) -> FileStore {
    FileStore::new(TrackerPaths::new(dir.path()))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

#[test]
fn single_item_flow_persists_ledger_and_log() {
    let (dir, mut api) = setup();

    api.scan_on("101,22,NC5,A,B,Desc,E1,E2,extra1,extra2 T", date())
        .unwrap();
    let result = api.scan_on("45", date()).unwrap();
    assert_eq!(result.display_lines, ["101,22,NC5,A,B,Desc,E2,45,07-03-2024"]);

    let ledger = fs::read_to_string(dir.path().join("Storage/Storage.csv")).unwrap();
    assert!(ledger.starts_with("Ref,ItemNo,NCNumber"));
    assert!(ledger.contains("101,22,NC5,A,B,Desc,E2,45,07-03-2024"));

    let log = fs::read_to_string(dir.path().join("Storage/Log.csv")).unwrap();
    assert!(log.contains("101,22,NC5,A,B,Desc,E2,45,07-03-2024,Storaged"));
}

#[test]
fn deletion_rewrites_ledger_and_appends_delivery() {
    let (dir, mut api) = setup();

    api.scan_on("101,22,NC5,A,B,Desc,E1,E2,extra1,extra2 T", date())
        .unwrap();
    api.scan_on("45", date()).unwrap();

    let later = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    api.scan_on("101,22,NC5,anything D", later).unwrap();

    let store = store_for(&dir);
    assert!(store.load_ledger().unwrap().is_empty());

    let log = store.load_log().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].row.date_stored, later);

    let raw = fs::read_to_string(dir.path().join("Storage/Log.csv")).unwrap();
    assert!(raw.contains("101,22,NC5,A,B,Desc,E2,45,09-03-2024,Delivered"));
}

#[test]
fn allocation_flow_assigns_location_and_stores_batch() {
    let (dir, mut api) = setup();
    store_for(&dir)
        .save_locations(&[LocationEntry::new("12-A-B", "0")])
        .unwrap();

    api.scan_on("45 T", date()).unwrap();
    api.scan_on("101,22,NC5,A,B,Desc,E1,E2,x,y T", date()).unwrap();
    api.scan_on("102,22,NC5,A,B,Desc,E1,E2,x,y T", date()).unwrap();
    api.scan_on("12-A-B T", date()).unwrap();

    let store = store_for(&dir);
    assert_eq!(store.load_locations().unwrap()[0].cage_no, "45");

    let ledger = store.load_ledger().unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(ledger.iter().all(|row| row.cage_no == "45"));
    assert_eq!(store.load_log().unwrap().len(), 2);
}

#[test]
fn interrupted_allocation_writes_nothing() {
    let (dir, mut api) = setup();

    api.scan_on("45 T", date()).unwrap();
    api.scan_on("exit t", date()).unwrap();

    assert!(!dir.path().join("Storage/Storage.csv").exists());
    assert!(!dir.path().join("Storage/Log.csv").exists());
}

#[test]
fn category_scan_builds_the_day_file() {
    let (dir, mut api) = setup();

    api.scan_on("r,i,n,f1,f2,d,x,y,z,1.5,0 L", date()).unwrap();
    let err = api
        .scan_on("r,i,n,f1,f2,d,x,y,z,1.5,0 L", date())
        .unwrap_err();
    assert!(matches!(err, TrackError::DuplicateScan));

    let day = fs::read_to_string(dir.path().join("Laser Cutter/07-03-2024.csv")).unwrap();
    assert!(day.starts_with("Ref,ItemNo,NCNumber"));
    assert!(day.contains("r,i,n,f1,f2,d,1.5,0"));
}

//! Scan-line classification and row normalization.
//!
//! Every label the scanner emits ends in a suffix code that decides its route:
//! `" T"` for the storage workflows, `" D"` for deletion, or a configured
//! single category letter. The grammar lives here and nowhere else.

use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::model::ItemRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static CAGE_DIRECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+ T$").unwrap());
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+-[A-Z]-[A-Z] T$").unwrap());

/// A classified scan line. Classification is a pure function of the line; how
/// a variant is handled may still depend on the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `<digits> T`: begin an allocation session with a known cage number.
    CageDirect { cage_no: String },
    /// `<digits>-<letter>-<letter> T`: a location code, meaning reset when
    /// idle and allocation target inside a cage session.
    LocationTarget { location: String },
    /// Any other `" T"` line: a multi-field item record starting the storage
    /// workflow (or another duct scan inside an allocation session).
    StorageStart { body: String },
    /// `" D"`: deletion request.
    Deletion { body: String },
    /// A configured category letter, routed to that category's day file.
    CategoryItem { suffix: char, body: String },
    /// Anything else.
    Invalid,
}

impl Payload {
    pub fn classify(line: &str, config: &TrackConfig) -> Payload {
        let line = line.trim();
        if line.ends_with(" T") {
            let body = line[..line.len() - 2].trim().to_string();
            if CAGE_DIRECT_RE.is_match(line) {
                return Payload::CageDirect { cage_no: body };
            }
            if LOCATION_RE.is_match(line) {
                return Payload::LocationTarget { location: body };
            }
            return Payload::StorageStart { body };
        }
        if let Some(body) = line.strip_suffix(" D") {
            return Payload::Deletion {
                body: body.trim().to_string(),
            };
        }
        if let Some((body, suffix)) = split_category_suffix(line) {
            if config.category(suffix).is_some() {
                return Payload::CategoryItem { suffix, body };
            }
        }
        Payload::Invalid
    }
}

fn split_category_suffix(line: &str) -> Option<(String, char)> {
    let suffix = line.chars().last()?;
    if !suffix.is_ascii_uppercase() {
        return None;
    }
    let body = line.strip_suffix(suffix)?.strip_suffix(' ')?;
    Some((body.trim().to_string(), suffix))
}

/// Normalize a storage/allocation row: at least 10 comma-separated fields,
/// of which the field at index 6 and the last two are scan-time artifacts.
pub fn normalize_storage_row(body: &str) -> Result<ItemRecord> {
    let mut fields: Vec<String> = body.split(',').map(|f| f.trim().to_string()).collect();
    if fields.len() < 10 {
        return Err(TrackError::MalformedPayload(format!(
            "expected at least 10 fields, got {}",
            fields.len()
        )));
    }
    fields.pop();
    fields.pop();
    fields.remove(6);
    Ok(ItemRecord::from_fields(fields))
}

/// Normalize a category-routed row: the contiguous span at indices 6..9 holds
/// scan-time artifacts and is removed.
pub fn normalize_category_row(body: &str) -> Result<String> {
    let mut fields: Vec<String> = body.split(',').map(|f| f.trim().to_string()).collect();
    if fields.len() < 9 {
        return Err(TrackError::MalformedPayload(format!(
            "expected at least 9 fields, got {}",
            fields.len()
        )));
    }
    fields.drain(6..9);
    Ok(fields.join(","))
}

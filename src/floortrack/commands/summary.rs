use crate::commands::{CmdMessage, CmdResult, TrackerPaths};
use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::store::fs::DAY_HEADER;
use chrono::NaiveDate;
use std::fs;

/// Roll the day's category files into one summary file.
///
/// For every configured category with a day file, the area column is totaled
/// (`AreaMetal`, or `AreaInsulation` for categories flagged that way) and the
/// file's rows are copied into `<data dir>/<DD-MM-YYYY>.csv` with the
/// category name appended. Categories without a day file report no total.
pub fn run(paths: &TrackerPaths, config: &TrackConfig, date: NaiveDate) -> Result<CmdResult> {
    let out_path = paths.summary_file(date);
    if out_path.exists() {
        fs::remove_file(&out_path)?;
    }

    let mut result = CmdResult::default();
    let mut rollup = String::new();

    for category in &config.categories {
        let day_path = paths.day_file(&category.name, date);
        if !day_path.exists() {
            result.totals.push((category.name.clone(), None));
            result.add_message(CmdMessage::info(format!("{}: no records", category.name)));
            continue;
        }

        let area_index = if category.insulation_area { 7 } else { 6 };
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&day_path)?;

        let mut total = 0.0;
        let mut rows: Vec<String> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let raw = record.get(area_index).unwrap_or_default().trim();
            let area: f64 = raw.parse().map_err(|_| {
                TrackError::MalformedPayload(format!(
                    "bad area value '{}' in {}",
                    raw,
                    day_path.display()
                ))
            })?;
            total += area;
            rows.push(record.iter().collect::<Vec<_>>().join(","));
        }
        let total = (total * 100.0).round() / 100.0;

        rollup.push_str(&format!("{} Sum: {} m^2\n", category.name, total));
        rollup.push_str(&DAY_HEADER.join(","));
        rollup.push('\n');
        for row in &rows {
            rollup.push_str(&format!("{},{}\n", row, category.name));
        }

        result.totals.push((category.name.clone(), Some(total)));
        result.add_message(CmdMessage::success(format!(
            "{}: {} m^2",
            category.name, total
        )));
    }

    if !rollup.is_empty() {
        fs::write(&out_path, rollup)?;
        result.add_message(CmdMessage::info(format!(
            "Summary written to {}",
            out_path.display()
        )));
    }

    Ok(result)
}

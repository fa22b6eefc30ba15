use crate::commands::{CmdMessage, CmdResult};
use crate::config::CategoryDef;
use crate::error::Result;
use crate::payload::normalize_category_row;
use crate::store::LedgerStore;
use chrono::NaiveDate;

/// Route a category-suffixed label into the category's current-day file.
pub fn run<S: LedgerStore>(
    store: &mut S,
    category: &CategoryDef,
    body: &str,
    date: NaiveDate,
) -> Result<CmdResult> {
    let row = normalize_category_row(body)?;
    store.append_day_row(&category.name, date, &row)?;

    Ok(CmdResult::default()
        .with_display_line(row)
        .with_message(CmdMessage::success("Data processed successfully.")))
}

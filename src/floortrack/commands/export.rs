use crate::commands::{file_date, CmdMessage, CmdResult};
use crate::error::{Result, TrackError};
use crate::store::fs::DAY_HEADER;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Convert a historical file into SQL-loadable per-operation row files.
///
/// The kind of input is sniffed from its first line: a plain category day
/// file (rows gain the operation, taken from the parent directory name, plus
/// the date), or a daily rollup (rows already carry their category; they gain
/// the date and are routed per operation). Output rows accumulate in
/// `SQL_<YYYY-MM-DD>_<operation>.csv` under `out_dir`.
pub fn run(file: &Path, out_dir: &Path) -> Result<CmdResult> {
    let content = fs::read_to_string(file)?;
    let first_line = content.lines().next().unwrap_or_default();

    let date = file_date(file).ok_or_else(|| {
        TrackError::MalformedPayload(format!(
            "file name is not a DD-MM-YYYY date: {}",
            file.display()
        ))
    })?;
    let date = date.format("%Y-%m-%d").to_string();

    let header = DAY_HEADER.join(",");
    let converted = if first_line == header {
        convert_day_file(file, &content, out_dir, &date)?
    } else if first_line.contains("Sum:") {
        convert_rollup(&content, out_dir, &date)?
    } else {
        return Err(TrackError::MalformedPayload(format!(
            "can't recognize this file: {}",
            file.display()
        )));
    };

    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Converted {} row(s) from {}",
        converted,
        file.display()
    ))))
}

/// A plain day file: the operation is the category directory it sits in.
fn convert_day_file(file: &Path, content: &str, out_dir: &Path, date: &str) -> Result<usize> {
    let operation = file
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            TrackError::MalformedPayload(format!(
                "no category directory for {}",
                file.display()
            ))
        })?;

    let mut rows = 0usize;
    for line in content.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        fields.push(operation.to_string());
        fields.push(date.to_string());
        append_sql_row(out_dir, date, operation, &fields)?;
        rows += 1;
    }
    Ok(rows)
}

/// A daily rollup: sum lines and repeated headers are skipped, and each data
/// row already names its operation in the appended last field.
fn convert_rollup(content: &str, out_dir: &Path, date: &str) -> Result<usize> {
    let mut rows = 0usize;
    for line in content.lines() {
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() < 9 {
            continue;
        }
        let operation = fields.last().cloned().unwrap_or_default();
        let mut fields = fields;
        fields.push(date.to_string());
        append_sql_row(out_dir, date, &operation, &fields)?;
        rows += 1;
    }
    Ok(rows)
}

fn append_sql_row(out_dir: &Path, date: &str, operation: &str, fields: &[String]) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("SQL_{}_{}.csv", date, operation));
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", fields.join(","))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn converts_plain_day_file() {
        let dir = TempDir::new().unwrap();
        let cat_dir = dir.path().join("Laser Cutter");
        fs::create_dir_all(&cat_dir).unwrap();
        let file = cat_dir.join("07-03-2024.csv");
        fs::write(
            &file,
            format!("{}\nr1,i,n,f1,f2,d,1.5,0\nr2,i,n,f1,f2,d,2.5,0\n", DAY_HEADER.join(",")),
        )
        .unwrap();

        let out = dir.path().join("out");
        run(&file, &out).unwrap();

        let sql = fs::read_to_string(out.join("SQL_2024-03-07_Laser Cutter.csv")).unwrap();
        let lines: Vec<&str> = sql.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "r1,i,n,f1,f2,d,1.5,0,Laser Cutter,2024-03-07");
    }

    #[test]
    fn converts_rollup_per_operation() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("07-03-2024.csv");
        let content = format!(
            "Laser Cutter Sum: 1.5 m^2\n{h}\nr1,i,n,f1,f2,d,1.5,0,Laser Cutter\n\
             Insulation Sum: 4.5 m^2\n{h}\nr2,i,n,f1,f2,d,0,4.5,Insulation\n",
            h = DAY_HEADER.join(",")
        );
        fs::write(&file, content).unwrap();

        let out = dir.path().join("out");
        run(&file, &out).unwrap();

        let laser = fs::read_to_string(out.join("SQL_2024-03-07_Laser Cutter.csv")).unwrap();
        assert_eq!(
            laser.trim(),
            "r1,i,n,f1,f2,d,1.5,0,Laser Cutter,2024-03-07"
        );
        let ins = fs::read_to_string(out.join("SQL_2024-03-07_Insulation.csv")).unwrap();
        assert_eq!(ins.trim(), "r2,i,n,f1,f2,d,0,4.5,Insulation,2024-03-07");
    }

    #[test]
    fn unrecognized_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("07-03-2024.csv");
        fs::write(&file, "something,else\n").unwrap();
        let err = run(&file, dir.path()).unwrap_err();
        assert!(matches!(err, TrackError::MalformedPayload(_)));
    }

    #[test]
    fn non_date_file_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.csv");
        fs::write(&file, format!("{}\n", DAY_HEADER.join(","))).unwrap();
        let err = run(&file, dir.path()).unwrap_err();
        assert!(matches!(err, TrackError::MalformedPayload(_)));
    }
}

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{CadenceError, Result};
use crate::models::Statement;
use crate::statements::Statements;

// Wells Fargo export columns (no header row).
const COL_DATE: usize = 0;
const COL_AMOUNT: usize = 1;
const COL_DESC: usize = 4;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].trim().parse().ok()?;
    let d: u32 = parts[1].trim().parse().ok()?;
    let y: i32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

// ---------------------------------------------------------------------------
// Wells Fargo checking export
// ---------------------------------------------------------------------------

pub fn import_wells_fargo(file_path: &Path) -> Result<Statements> {
    let file = std::fs::File::open(file_path).map_err(|e| {
        CadenceError::Other(format!("Cannot open {}: {e}", file_path.display()))
    })?;
    let rows = parse_wells_fargo(std::io::BufReader::new(file))?;
    log::info!("imported {} statements from {}", rows.len(), file_path.display());
    Ok(Statements::from_rows(rows))
}

pub fn parse_wells_fargo<R: Read>(reader: R) -> Result<Vec<Statement>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() <= COL_DESC {
            log::warn!("line {}: expected 5 columns, found {}", line + 1, record.len());
            continue;
        }
        let Some(date) = parse_date_mdy(&record[COL_DATE]) else {
            log::warn!("line {}: skipping row with date {:?}", line + 1, &record[COL_DATE]);
            continue;
        };
        rows.push(Statement {
            date,
            amount: parse_amount(&record[COL_AMOUNT]),
            desc: record[COL_DESC].trim().to_string(),
        });
    }
    Ok(rows)
}

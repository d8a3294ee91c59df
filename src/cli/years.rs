use comfy_table::{Cell, CellAlignment, Table};

use crate::error::{CadenceError, Result};
use crate::fmt::money;
use crate::index::group_by_year;
use crate::loader::load_days;
use crate::models::{DayEntry, StatusColor};
use crate::settings::calendar_path;

pub fn run(file: Option<String>) -> Result<()> {
    let path = calendar_path(file);
    let days = load_days(&path)?;
    let index = group_by_year(&days);
    if index.years().is_empty() {
        return Err(CadenceError::EmptyData(path.display().to_string()));
    }

    let mut table = Table::new();
    table.set_header(vec!["Year", "Days", "Positive", "Negative", "Net"]);
    for year in index.years() {
        let Some(entries) = index.days_in(year) else {
            continue;
        };
        let (positive, negative) = color_counts(entries.values());
        let net: f64 = entries.values().map(|d| d.net_daily_avg).sum();
        table.add_row(vec![
            Cell::new(year),
            Cell::new(entries.len()).set_alignment(CellAlignment::Right),
            Cell::new(positive).set_alignment(CellAlignment::Right),
            Cell::new(negative).set_alignment(CellAlignment::Right),
            Cell::new(money(net)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    let undated = index.undated().len();
    if undated > 0 {
        println!("{undated} days without a readable year are not shown");
    }
    Ok(())
}

/// Green and red day counts, matching the cell colors.
fn color_counts<'a>(entries: impl Iterator<Item = &'a DayEntry>) -> (usize, usize) {
    entries.fold((0, 0), |(green, red), d| match d.status_color {
        StatusColor::Green => (green + 1, red),
        StatusColor::Red => (green, red + 1),
    })
}

use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};

use crate::fmt::{Amount, Sign};
use crate::grid::{CellState, MonthLabel, DAYS_PER_WEEK};
use crate::render::{DayPanel, Snapshot};

const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const ROW_PREFIX: usize = 4;
const CELL_WIDTH: usize = 2;

/// Render the current snapshot as plain text with ANSI colors (when enabled):
/// year header, label strip, seven weekday rows, legend, and the panel if open.
pub fn render(snap: &Snapshot) -> String {
    let mut out = String::new();
    if let Some(year) = snap.year {
        let others: Vec<String> = snap
            .years
            .iter()
            .filter(|y| **y != year)
            .map(|y| y.to_string())
            .collect();
        out.push_str(&format!("{}", year.to_string().bold()));
        if !others.is_empty() {
            out.push_str(&format!("  (also: {})", others.join(", ")).dimmed().to_string());
        }
        out.push('\n');
    }
    if snap.cells.is_empty() {
        return out;
    }

    out.push_str(&label_strip(&snap.labels));
    out.push('\n');

    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        out.push_str(&format!("{name:<width$}", width = ROW_PREFIX));
        for (_, state) in snap.cells.iter().skip(weekday).step_by(DAYS_PER_WEEK) {
            out.push_str(&format!("{} ", cell_glyph(*state)));
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "{} no data  {} net positive  {} net negative\n",
        cell_glyph(CellState::Empty),
        cell_glyph(CellState::Positive),
        cell_glyph(CellState::Negative),
    ));

    if let Some(panel) = snap.visible_panel() {
        out.push('\n');
        out.push_str(&format_panel(panel));
        out.push('\n');
    }
    out
}

/// Month names positioned over their week columns. A label that would
/// overlap the previous one is dropped.
pub fn label_strip(labels: &[MonthLabel]) -> String {
    let mut line = " ".repeat(ROW_PREFIX);
    for label in labels {
        let col = ROW_PREFIX + label.week() * CELL_WIDTH;
        if col < line.len() {
            continue;
        }
        line.push_str(&" ".repeat(col - line.len()));
        line.push_str(label.text);
        line.push(' ');
    }
    line.trim_end().to_string()
}

fn cell_glyph(state: CellState) -> ColoredString {
    match state {
        CellState::Empty => "\u{00b7}".bright_black(),
        CellState::Positive => "\u{25a0}".green(),
        CellState::Negative => "\u{25a0}".red(),
    }
}

pub fn colored_amount(amount: &Amount) -> ColoredString {
    match amount.sign {
        Sign::Positive => amount.text.as_str().green(),
        Sign::Negative => amount.text.as_str().red(),
    }
}

/// Detail panel as a date header, the net line, and a statement table.
pub fn format_panel(panel: &DayPanel) -> String {
    let mut out = format!("{}\nNet: {}\n", panel.date.bold(), colored_amount(&panel.net));
    if panel.statements.is_empty() {
        return out;
    }
    let mut table = Table::new();
    table.set_header(vec!["Description", "Amount"]);
    for line in &panel.statements {
        let desc = if line.is_recurring {
            format!("{} \u{21bb}", line.desc)
        } else {
            line.desc.clone()
        };
        table.add_row(vec![Cell::new(desc), Cell::new(colored_amount(&line.amount))]);
    }
    out.push_str(&table.to_string());
    out
}

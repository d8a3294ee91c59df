pub mod html;
pub mod text;

use chrono::NaiveDate;

use crate::fmt::Amount;
use crate::grid::{CellState, GridCell, MonthLabel};
use crate::models::DayEntry;

/// What the detail panel shows for one activated day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPanel {
    /// ISO key the entry was looked up by; matches the grid cell.
    pub key: String,
    /// The entry's own date field, shown as the heading.
    pub date: String,
    pub net: Amount,
    pub statements: Vec<PanelLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelLine {
    pub desc: String,
    pub amount: Amount,
    pub is_recurring: bool,
}

impl DayPanel {
    pub fn from_entry(key: &str, entry: &DayEntry) -> Self {
        Self {
            key: key.to_string(),
            date: entry.date.clone(),
            net: Amount::new(entry.net_daily_avg),
            statements: entry
                .statements
                .iter()
                .map(|s| PanelLine {
                    desc: s.desc.clone(),
                    amount: Amount::new(s.amount),
                    is_recurring: s.is_recurring,
                })
                .collect(),
        }
    }
}

/// The surface a session draws on. Each call replaces that part of the
/// surface wholesale.
pub trait RenderPort {
    fn populate_years(&mut self, years: &[i32], selected: i32);
    fn draw_grid(&mut self, year: i32, cells: &[GridCell<'_>]);
    fn draw_labels(&mut self, labels: &[MonthLabel]);
    fn show_panel(&mut self, panel: &DayPanel);
    fn hide_panel(&mut self);
}

/// Owned copy of the most recent draw calls. Hosts that repaint on their own
/// schedule (the terminal view, the text dump) render from this.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    pub years: Vec<i32>,
    pub year: Option<i32>,
    pub cells: Vec<(NaiveDate, CellState)>,
    pub labels: Vec<MonthLabel>,
    pub panel: Option<DayPanel>,
    pub panel_visible: bool,
}

impl Snapshot {
    pub fn visible_panel(&self) -> Option<&DayPanel> {
        self.panel.as_ref().filter(|_| self.panel_visible)
    }
}

impl RenderPort for Snapshot {
    fn populate_years(&mut self, years: &[i32], selected: i32) {
        self.years = years.to_vec();
        self.year = Some(selected);
    }

    fn draw_grid(&mut self, year: i32, cells: &[GridCell<'_>]) {
        self.year = Some(year);
        self.cells = cells.iter().map(|c| (c.date, c.state())).collect();
    }

    fn draw_labels(&mut self, labels: &[MonthLabel]) {
        self.labels = labels.to_vec();
    }

    fn show_panel(&mut self, panel: &DayPanel) {
        self.panel = Some(panel.clone());
        self.panel_visible = true;
    }

    fn hide_panel(&mut self) {
        self.panel_visible = false;
    }
}

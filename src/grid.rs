use chrono::{Datelike, NaiveDate, Weekday};

use crate::index::CalendarIndex;
use crate::models::{DayEntry, StatusColor};

pub const DAYS_PER_WEEK: usize = 7;

const MONTH_ABBREVS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Every date from the Monday on or before Jan 1 of `year` through Dec 31,
/// inclusive. Empty if the year is outside chrono's range.
pub fn build_date_range(year: i32) -> Vec<NaiveDate> {
    let (Some(mut start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };

    while start.weekday() != Weekday::Mon {
        match start.pred_opt() {
            Some(prev) => start = prev,
            None => break,
        }
    }

    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Visual state of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<'a> {
    pub date: NaiveDate,
    pub entry: Option<&'a DayEntry>,
}

impl GridCell<'_> {
    pub fn iso(&self) -> String {
        format_iso(self.date)
    }

    pub fn state(&self) -> CellState {
        match self.entry {
            None => CellState::Empty,
            Some(e) => match e.status_color {
                StatusColor::Green => CellState::Positive,
                StatusColor::Red => CellState::Negative,
            },
        }
    }

    /// Only cells with an entry open the detail panel.
    pub fn is_interactive(&self) -> bool {
        self.entry.is_some()
    }
}

/// Grid cells for `year`, looked up by exact ISO string in that year's
/// bucket. Leading days from the previous December always render empty.
pub fn build_grid(year: i32, index: &CalendarIndex) -> Vec<GridCell<'_>> {
    let days = index.days_in(year);
    build_date_range(year)
        .into_iter()
        .map(|date| GridCell {
            date,
            entry: days.and_then(|d| d.get(&format_iso(date))),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    /// Index into the date sequence.
    pub position: usize,
    /// 1-12
    pub month: u32,
    pub text: &'static str,
}

impl MonthLabel {
    pub fn week(&self) -> usize {
        self.position / DAYS_PER_WEEK
    }
}

/// One label per month run, placed on the first date that falls in the
/// month's first seven days.
pub fn month_labels(dates: &[NaiveDate]) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut last_month: Option<u32> = None;
    for (position, date) in dates.iter().enumerate() {
        let month = date.month();
        if last_month != Some(month) && date.day() <= 7 {
            labels.push(MonthLabel {
                position,
                month,
                text: MONTH_ABBREVS[month0(month)],
            });
            last_month = Some(month);
        }
    }
    labels
}

fn month0(month: u32) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

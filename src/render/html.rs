//! Static HTML rendering.
//!
//! Produces a self-contained page (or a fragment for template injection)
//! holding every year's grid and every day's detail panel. A small inline
//! script switches years and opens panels, so the page works offline.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{CadenceError, Result};
use crate::fmt::{Amount, Sign};
use crate::grid::{CellState, GridCell, MonthLabel};
use crate::render::{DayPanel, RenderPort};
use crate::session::CalendarSession;

#[derive(Debug, Default)]
pub struct HtmlPort {
    years: Vec<i32>,
    selected: Option<i32>,
    current: Option<i32>,
    grids: BTreeMap<i32, String>,
    labels: BTreeMap<i32, String>,
    panels: BTreeMap<String, String>,
}

impl RenderPort for HtmlPort {
    fn populate_years(&mut self, years: &[i32], selected: i32) {
        self.years = years.to_vec();
        self.selected = Some(selected);
    }

    fn draw_grid(&mut self, year: i32, cells: &[GridCell<'_>]) {
        self.current = Some(year);
        let mut out = String::new();
        for cell in cells {
            let class = match cell.state() {
                CellState::Empty => "cell empty",
                CellState::Positive => "cell pos",
                CellState::Negative => "cell neg",
            };
            let iso = cell.iso();
            if cell.is_interactive() {
                out.push_str(&format!(
                    r#"<div class="{class}" data-date="{iso}" title="{iso}"></div>"#
                ));
            } else {
                out.push_str(&format!(r#"<div class="{class}" title="{iso}"></div>"#));
            }
        }
        self.grids.insert(year, out);
    }

    fn draw_labels(&mut self, labels: &[MonthLabel]) {
        let Some(year) = self.current else {
            return;
        };
        let out: String = labels
            .iter()
            .map(|l| {
                format!(
                    r#"<span style="grid-column: {}">{}</span>"#,
                    l.week() + 1,
                    l.text
                )
            })
            .collect();
        self.labels.insert(year, out);
    }

    fn show_panel(&mut self, panel: &DayPanel) {
        self.panels.insert(panel.key.clone(), panel_markup(panel));
    }

    // Panels start hidden in the static page; the script toggles them.
    fn hide_panel(&mut self) {}
}

impl HtmlPort {
    /// The calendar markup: year selector, label strip, grid, and panel.
    pub fn fragment(&self) -> String {
        let selected = self.selected.unwrap_or_default();
        let options: String = self
            .years
            .iter()
            .map(|y| {
                let sel = if *y == selected { " selected" } else { "" };
                format!(r#"<option value="{y}"{sel}>{y}</option>"#)
            })
            .collect();
        let labels: String = self
            .labels
            .iter()
            .map(|(y, l)| {
                format!(r#"<div class="label-row" data-year="{y}"{}>{l}</div>"#, hidden(*y, selected))
            })
            .collect();
        let grids: String = self
            .grids
            .iter()
            .map(|(y, g)| {
                format!(r#"<div class="grid" data-year="{y}"{}>{g}</div>"#, hidden(*y, selected))
            })
            .collect();
        let panels: String = self.panels.values().cloned().collect();

        format!(
            r#"<div class="cadence">
<select id="year-select">{options}</select>
<div id="month-labels">{labels}</div>
<div id="calendar">{grids}</div>
<div id="day-panel" hidden>{panels}</div>
<style>{css}</style>
<script>{js}</script>
</div>"#,
            css = inline_css(),
            js = inline_javascript(),
        )
    }
}

fn hidden(year: i32, selected: i32) -> &'static str {
    if year == selected {
        ""
    } else {
        " hidden"
    }
}

/// Drive `session` through every year and every active day so the port
/// holds the complete static page. Leaves the session on its latest year.
pub fn render_all(session: &mut CalendarSession, port: &mut HtmlPort) -> Result<()> {
    let years = session.index().years();
    let latest = session.current_year().ok_or(CadenceError::NotLoaded)?;
    for year in years {
        session.select_year(year, port)?;
        let dates: Vec<String> = session
            .index()
            .days_in(year)
            .map(|days| days.keys().cloned().collect())
            .unwrap_or_default();
        for date in dates {
            session.activate(&date, port)?;
        }
    }
    session.select_year(latest, port)
}

fn panel_markup(panel: &DayPanel) -> String {
    let items: String = panel
        .statements
        .iter()
        .map(|s| {
            let marker = if s.is_recurring { " recurring" } else { "" };
            format!(
                r#"<li class="stmt{marker}"><span class="desc">{}</span>{}</li>"#,
                escape_html(&s.desc),
                amount_markup(&s.amount),
            )
        })
        .collect();
    format!(
        r#"<div class="day-detail" data-date="{key}" hidden><h2>{date}</h2><div class="net">Net: {net}</div><ul>{items}</ul></div>"#,
        key = escape_html(&panel.key),
        date = escape_html(&panel.date),
        net = amount_markup(&panel.net),
    )
}

fn amount_markup(amount: &Amount) -> String {
    let class = match amount.sign {
        Sign::Positive => "amount pos",
        Sign::Negative => "amount neg",
    };
    format!(r#"<span class="{class}">{}</span>"#, amount.text)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a fragment in a standalone document.
pub fn page(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Cash-flow calendar</title>
</head>
<body>
{fragment}
</body>
</html>
"#
    )
}

/// Replace the contents of the `<div>` whose id is `target_id` with
/// `inject`. Nested divs inside the target are matched so the right closing
/// tag is used.
pub fn inject_into_template(template: &str, target_id: &str, inject: &str) -> Result<String> {
    let open = Regex::new(&format!(
        r#"(?i)<div\b[^>]*\bid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(target_id)
    ))
    .map_err(|e| CadenceError::Other(e.to_string()))?;
    let tags = Regex::new(r"(?i)<div\b|</div\s*>").map_err(|e| CadenceError::Other(e.to_string()))?;

    let start = open
        .find(template)
        .ok_or_else(|| CadenceError::TemplateTarget(target_id.to_string()))?;

    let mut depth = 1usize;
    for tag in tags.find_iter(&template[start.end()..]) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                let close = start.end() + tag.start();
                return Ok(format!(
                    "{}{}{}",
                    &template[..start.end()],
                    inject,
                    &template[close..]
                ));
            }
        } else {
            depth += 1;
        }
    }
    Err(CadenceError::TemplateTarget(target_id.to_string()))
}

fn inline_css() -> &'static str {
    r#"
.cadence { font-family: system-ui, sans-serif; color: #ddd; background: #111; padding: 1rem; }
#month-labels .label-row, #calendar .grid { display: grid; grid-auto-columns: 14px; column-gap: 2px; }
#month-labels .label-row { grid-auto-flow: column; font-size: 10px; height: 14px; }
#calendar .grid { grid-template-rows: repeat(7, 12px); grid-auto-flow: column; row-gap: 2px; }
.cell { width: 12px; height: 12px; border-radius: 2px; }
.cell.empty { background: #262626; }
.cell.pos { background: #22c55e; cursor: pointer; }
.cell.neg { background: #ef4444; cursor: pointer; }
.cell.pos:hover { background: #4ade80; }
.cell.neg:hover { background: #f87171; }
#day-panel { margin-top: 1rem; max-width: 28rem; }
#day-panel ul { list-style: none; padding: 0; }
.stmt { display: flex; justify-content: space-between; gap: .5rem; font-size: .875rem; }
.stmt .desc { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.amount.pos { color: #4ade80; }
.amount.neg { color: #f87171; }
[hidden] { display: none !important; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function () {
  var select = document.getElementById('year-select');
  var panel = document.getElementById('day-panel');
  function showYear(year) {
    document.querySelectorAll('#month-labels [data-year], #calendar [data-year]').forEach(function (el) {
      el.hidden = el.dataset.year !== year;
    });
    panel.hidden = true;
  }
  select.addEventListener('change', function () { showYear(select.value); });
  document.getElementById('calendar').addEventListener('click', function (e) {
    var cell = e.target.closest('[data-date]');
    if (!cell) return;
    panel.querySelectorAll('.day-detail').forEach(function (el) {
      el.hidden = el.dataset.date !== cell.dataset.date;
    });
    panel.hidden = false;
  });
  showYear(select.value);
})();
"#
}

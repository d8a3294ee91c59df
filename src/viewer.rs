use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::grid::{format_iso, CellState, MonthLabel, DAYS_PER_WEEK};
use crate::render::{DayPanel, RenderPort, Snapshot};
use crate::session::CalendarSession;
use crate::tui::{
    self, amount_span, cell_style, View, ViewAction, CURSOR_STYLE, FOOTER_STYLE, HEADER_STYLE,
};

const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const ROW_PREFIX: u16 = 4;
const CELL_WIDTH: u16 = 2;
const CELL_GLYPH: &str = "\u{25a0}";
const EMPTY_GLYPH: &str = "\u{00b7}";

/// Interactive calendar: a cursor over the grid, Enter opens the detail
/// panel, n/p switch years.
pub struct CalendarViewer {
    session: CalendarSession,
    snap: Snapshot,
    cursor: usize,
    status_message: Option<String>,
}

impl CalendarViewer {
    /// `session` must already be loaded with `snap` as its port.
    pub fn new(session: CalendarSession, snap: Snapshot) -> Self {
        let mut viewer = Self {
            session,
            snap,
            cursor: 0,
            status_message: None,
        };
        viewer.cursor_to_latest_entry();
        viewer
    }

    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1),                     // title
            Constraint::Length(1),                     // month labels
            Constraint::Length(DAYS_PER_WEEK as u16), // grid
            Constraint::Length(1),                     // legend
            Constraint::Length(1),                     // spacer
            Constraint::Fill(1),                       // panel
            Constraint::Length(1),                     // status
            Constraint::Length(1),                     // keys
        ])
        .split(frame.area());

        let year = self.snap.year.unwrap_or_default();
        frame.render_widget(
            Paragraph::new(format!("Cash-flow calendar {year}")).style(HEADER_STYLE),
            areas[0],
        );

        let first_week = self.first_visible_week(areas[2].width);
        let visible_weeks = visible_weeks(areas[2].width);
        frame.render_widget(
            Paragraph::new(label_line(&self.snap.labels, first_week, visible_weeks)),
            areas[1],
        );
        frame.render_widget(
            Paragraph::new(self.grid_lines(first_week, visible_weeks)),
            areas[2],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(EMPTY_GLYPH, cell_style(CellState::Empty)),
                Span::raw(" no data  "),
                Span::styled(CELL_GLYPH, cell_style(CellState::Positive)),
                Span::raw(" net positive  "),
                Span::styled(CELL_GLYPH, cell_style(CellState::Negative)),
                Span::raw(" net negative"),
            ]))
            .style(FOOTER_STYLE),
            areas[3],
        );

        if let Some(panel) = self.snap.visible_panel() {
            draw_panel(frame, panel, areas[5]);
        }

        frame.render_widget(
            Paragraph::new(self.status_line()).style(FOOTER_STYLE),
            areas[6],
        );
        frame.render_widget(
            Paragraph::new(
                "\u{2190}/\u{2192}:week  \u{2191}/\u{2193}:day  Enter:open  Esc:close  n/p:year  q:quit",
            )
            .style(FOOTER_STYLE),
            areas[7],
        );
    }

    /// Handle a key event without touching the terminal.
    pub fn handle_key_event(&mut self, code: KeyCode) -> ViewAction {
        self.status_message = None;
        match code {
            KeyCode::Char('q') => return ViewAction::Close,
            KeyCode::Esc => {
                if self.snap.panel_visible {
                    self.snap.hide_panel();
                } else {
                    return ViewAction::Close;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-(DAYS_PER_WEEK as isize)),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(DAYS_PER_WEEK as isize),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.snap.cells.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_cursor(),
            KeyCode::Char('n') | KeyCode::Char(']') => self.step_year(-1),
            KeyCode::Char('p') | KeyCode::Char('[') => self.step_year(1),
            _ => {}
        }
        ViewAction::Continue
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.snap.cells.is_empty() {
            return;
        }
        let max = self.snap.cells.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    fn cursor_to_latest_entry(&mut self) {
        self.cursor = self
            .snap
            .cells
            .iter()
            .rposition(|(_, state)| *state != CellState::Empty)
            .unwrap_or(0);
    }

    fn activate_cursor(&mut self) {
        let Some((date, _)) = self.snap.cells.get(self.cursor) else {
            return;
        };
        let iso = format_iso(*date);
        match self.session.activate(&iso, &mut self.snap) {
            Ok(true) => {}
            Ok(false) => self.status_message = Some(format!("No data for {iso}")),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Years are listed newest first, so -1 moves to a newer year.
    fn step_year(&mut self, step: isize) {
        let Some(current) = self.session.current_year() else {
            return;
        };
        let years = &self.snap.years;
        let Some(pos) = years.iter().position(|y| *y == current) else {
            return;
        };
        let target = pos as isize + step;
        if target < 0 || target >= years.len() as isize {
            self.status_message = Some("No more years".to_string());
            return;
        }
        let year = years[target as usize];
        match self.session.select_year(year, &mut self.snap) {
            Ok(()) => self.cursor_to_latest_entry(),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn first_visible_week(&self, width: u16) -> usize {
        let visible = visible_weeks(width);
        let cursor_week = self.cursor / DAYS_PER_WEEK;
        if cursor_week < visible {
            0
        } else {
            cursor_week + 1 - visible
        }
    }

    fn grid_lines(&self, first_week: usize, weeks: usize) -> Vec<Line<'static>> {
        WEEKDAYS
            .iter()
            .enumerate()
            .map(|(weekday, name)| {
                let mut spans = vec![Span::styled(
                    format!("{name:<width$}", width = ROW_PREFIX as usize),
                    FOOTER_STYLE,
                )];
                for week in first_week..first_week + weeks {
                    let idx = week * DAYS_PER_WEEK + weekday;
                    let Some((_, state)) = self.snap.cells.get(idx) else {
                        break;
                    };
                    let glyph = if *state == CellState::Empty {
                        EMPTY_GLYPH
                    } else {
                        CELL_GLYPH
                    };
                    let mut style = cell_style(*state);
                    if idx == self.cursor {
                        style = style.patch(CURSOR_STYLE);
                    }
                    spans.push(Span::styled(glyph, style));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn status_line(&self) -> String {
        let cursor = self
            .snap
            .cells
            .get(self.cursor)
            .map(|(date, _)| format_iso(*date))
            .unwrap_or_default();
        let years = self
            .snap
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        match &self.status_message {
            Some(msg) => format!("{cursor} | years: {years} | {msg}"),
            None => format!("{cursor} | years: {years}"),
        }
    }
}

impl View for CalendarViewer {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_frame(frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        self.handle_key_event(code)
    }
}

fn visible_weeks(width: u16) -> usize {
    (width.saturating_sub(ROW_PREFIX) / CELL_WIDTH).max(1) as usize
}

fn label_line(labels: &[MonthLabel], first_week: usize, weeks: usize) -> Line<'static> {
    let mut text = " ".repeat(ROW_PREFIX as usize);
    for label in labels {
        let week = label.week();
        if week < first_week || week >= first_week + weeks {
            continue;
        }
        let col = ROW_PREFIX as usize + (week - first_week) * CELL_WIDTH as usize;
        if col < text.len() {
            continue;
        }
        text.push_str(&" ".repeat(col - text.len()));
        text.push_str(label.text);
    }
    Line::styled(text, FOOTER_STYLE)
}

fn draw_panel(frame: &mut Frame, panel: &DayPanel, area: Rect) {
    let areas = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).split(area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(panel.date.clone(), HEADER_STYLE),
            Line::from(vec![Span::raw("Net: "), amount_span(&panel.net)]),
        ]),
        areas[0],
    );

    let amount_width = 14u16;
    let desc_width = areas[1].width.saturating_sub(amount_width + 1).max(10) as usize;
    let rows: Vec<Row> = panel
        .statements
        .iter()
        .map(|line| {
            let desc = if line.is_recurring {
                format!("{} \u{21bb}", line.desc)
            } else {
                line.desc.clone()
            };
            let (wrapped, height) = tui::wrap_text(&desc, desc_width);
            Row::new(vec![Cell::from(wrapped), Cell::from(amount_span(&line.amount))])
                .height(height)
        })
        .collect();
    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(amount_width)])
        .header(Row::new(vec!["Description", "Amount"]).style(HEADER_STYLE))
        .column_spacing(1);
    frame.render_widget(table, areas[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{MemorySource, TWO_YEARS};

    fn viewer() -> CalendarViewer {
        let mut session = CalendarSession::new();
        let mut snap = Snapshot::default();
        session.load(&MemorySource(TWO_YEARS), &mut snap).unwrap();
        CalendarViewer::new(session, snap)
    }

    fn cursor_iso(v: &CalendarViewer) -> String {
        format_iso(v.snap.cells[v.cursor].0)
    }

    #[test]
    fn test_cursor_starts_on_latest_entry() {
        let v = viewer();
        assert_eq!(cursor_iso(&v), "2024-03-01");
    }

    #[test]
    fn test_cursor_moves_by_day_and_week() {
        let mut v = viewer();
        v.handle_key_event(KeyCode::Down);
        assert_eq!(cursor_iso(&v), "2024-03-02");
        v.handle_key_event(KeyCode::Left);
        assert_eq!(cursor_iso(&v), "2024-02-24");
        v.handle_key_event(KeyCode::Home);
        v.handle_key_event(KeyCode::Up);
        assert_eq!(v.cursor, 0);
        v.handle_key_event(KeyCode::End);
        v.handle_key_event(KeyCode::Right);
        assert_eq!(cursor_iso(&v), "2024-12-31");
    }

    #[test]
    fn test_enter_opens_panel() {
        let mut v = viewer();
        v.handle_key_event(KeyCode::Enter);
        let panel = v.snap.visible_panel().unwrap();
        assert_eq!(panel.net.text, "-12.50");
    }

    #[test]
    fn test_enter_on_empty_cell() {
        let mut v = viewer();
        v.handle_key_event(KeyCode::Down);
        v.handle_key_event(KeyCode::Enter);
        assert!(v.snap.visible_panel().is_none());
        assert!(v.status_message.as_deref().unwrap().contains("2024-03-02"));
    }

    #[test]
    fn test_esc_closes_panel_then_view() {
        let mut v = viewer();
        v.handle_key_event(KeyCode::Enter);
        assert!(matches!(v.handle_key_event(KeyCode::Esc), ViewAction::Continue));
        assert!(v.snap.visible_panel().is_none());
        assert!(matches!(v.handle_key_event(KeyCode::Esc), ViewAction::Close));
    }

    #[test]
    fn test_year_switch_hides_panel() {
        let mut v = viewer();
        v.handle_key_event(KeyCode::Enter);
        v.handle_key_event(KeyCode::Char('p'));
        assert_eq!(v.session.current_year(), Some(2023));
        assert_eq!(v.snap.year, Some(2023));
        assert!(v.snap.visible_panel().is_none());
        assert_eq!(cursor_iso(&v), "2023-05-10");

        v.handle_key_event(KeyCode::Char('p'));
        assert_eq!(v.session.current_year(), Some(2023));
        assert_eq!(v.status_message.as_deref(), Some("No more years"));

        v.handle_key_event(KeyCode::Char('n'));
        assert_eq!(v.session.current_year(), Some(2024));
    }

    #[test]
    fn test_q_closes() {
        let mut v = viewer();
        assert!(matches!(v.handle_key_event(KeyCode::Char('q')), ViewAction::Close));
    }

    #[test]
    fn test_first_visible_week_follows_cursor() {
        let mut v = viewer();
        v.cursor = 0;
        assert_eq!(v.first_visible_week(24), 0);
        v.cursor = 52 * DAYS_PER_WEEK;
        // 24 columns: 4 prefix + 10 weeks.
        assert_eq!(v.first_visible_week(24), 43);
    }

    #[test]
    fn test_label_line_window() {
        let labels = vec![
            MonthLabel { position: 0, month: 1, text: "Jan" },
            MonthLabel { position: 35, month: 2, text: "Feb" },
        ];
        let line = label_line(&labels, 0, 10);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "    Jan       Feb");
        let shifted = label_line(&labels, 3, 10);
        let text: String = shifted.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "        Feb");
    }
}

use crate::error::{CadenceError, Result};
use crate::grid::{build_grid, month_labels};
use crate::index::{group_by_year, CalendarIndex};
use crate::loader::CalendarSource;
use crate::render::{DayPanel, RenderPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loading,
    Loaded { year: i32 },
    /// Terminal: a session never retries a failed load.
    LoadFailed,
}

/// Owns the loaded calendar and the selected year for one viewing session.
/// Loading happens once; a reload is a new session.
#[derive(Debug)]
pub struct CalendarSession {
    state: SessionState,
    index: CalendarIndex,
}

impl Default for CalendarSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unloaded,
            index: CalendarIndex::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn index(&self) -> &CalendarIndex {
        &self.index
    }

    pub fn current_year(&self) -> Option<i32> {
        match self.state() {
            SessionState::Loaded { year } => Some(year),
            _ => None,
        }
    }

    /// Fetch, index, and render the most recent year. On failure the port is
    /// left untouched and the session stays failed.
    pub fn load(&mut self, source: &dyn CalendarSource, port: &mut dyn RenderPort) -> Result<()> {
        match self.state {
            SessionState::Unloaded => {}
            SessionState::LoadFailed => return Err(CadenceError::SessionFailed),
            SessionState::Loading | SessionState::Loaded { .. } => {
                return Err(CadenceError::Other(
                    "calendar already loaded in this session".into(),
                ))
            }
        }

        self.state = SessionState::Loading;
        let days = match source.fetch() {
            Ok(days) => days,
            Err(e) => {
                log::error!("failed to load calendar from {}: {e}", source.location());
                self.state = SessionState::LoadFailed;
                return Err(e);
            }
        };

        let index = group_by_year(&days);
        let Some(latest) = index.latest_year() else {
            log::error!("{} has no days", source.location());
            self.state = SessionState::LoadFailed;
            return Err(CadenceError::EmptyData(source.location()));
        };
        log::info!(
            "indexed {} days across {} years from {} ({} without a readable year)",
            index.len(),
            index.years().len(),
            source.location(),
            index.undated().len()
        );

        self.index = index;
        port.populate_years(&self.index.years(), latest);
        self.render_year(latest, port);
        self.state = SessionState::Loaded { year: latest };
        Ok(())
    }

    /// Redraw for another year without reloading. Selecting the current
    /// year again produces the same output.
    pub fn select_year(&mut self, year: i32, port: &mut dyn RenderPort) -> Result<()> {
        self.ensure_loaded()?;
        if !self.index.contains_year(year) {
            return Err(CadenceError::UnknownYear(year));
        }
        log::debug!("switching to {year}");
        self.render_year(year, port);
        self.state = SessionState::Loaded { year };
        Ok(())
    }

    /// Open the detail panel for `date` if the current year has an entry for
    /// it. Returns false for empty cells, which are not interactive.
    pub fn activate(&self, date: &str, port: &mut dyn RenderPort) -> Result<bool> {
        let year = self.ensure_loaded()?;
        let entry = self.index.days_in(year).and_then(|days| days.get(date));
        match entry {
            Some(entry) => {
                port.show_panel(&DayPanel::from_entry(date, entry));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ensure_loaded(&self) -> Result<i32> {
        match self.state {
            SessionState::Loaded { year } => Ok(year),
            SessionState::LoadFailed => Err(CadenceError::SessionFailed),
            _ => Err(CadenceError::NotLoaded),
        }
    }

    fn render_year(&self, year: i32, port: &mut dyn RenderPort) {
        port.hide_panel();
        let cells = build_grid(year, &self.index);
        port.draw_grid(year, &cells);
        let dates: Vec<_> = cells.iter().map(|c| c.date).collect();
        port.draw_labels(&month_labels(&dates));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::loader::{parse_document, Days};
    use crate::render::Snapshot;

    /// In-memory document source.
    pub(crate) struct MemorySource(pub &'static str);

    impl CalendarSource for MemorySource {
        fn location(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<Days> {
            parse_document(self.0, "memory")
        }
    }

    pub(crate) const TWO_YEARS: &str = r#"{"days": {
        "2023-05-10": {"date": "2023-05-10", "status_color": "green", "net_daily_avg": 20.0,
            "statements": [{"desc": "Refund", "amount": 20.0}]},
        "2024-03-01": {"date": "2024-03-01", "status_color": "red", "net_daily_avg": -12.5,
            "statements": [{"desc": "Coffee", "amount": -3.2}]}
    }}"#;

    fn loaded() -> (CalendarSession, Snapshot) {
        let mut session = CalendarSession::new();
        let mut port = Snapshot::default();
        session.load(&MemorySource(TWO_YEARS), &mut port).unwrap();
        (session, port)
    }

    #[test]
    fn test_load_selects_latest_year() {
        let (session, port) = loaded();
        assert_eq!(session.state(), SessionState::Loaded { year: 2024 });
        assert_eq!(port.years, vec![2024, 2023]);
        assert_eq!(port.year, Some(2024));
        assert_eq!(port.cells.len(), 366);
        assert_eq!(port.labels.len(), 12);
        assert!(!port.panel_visible);
    }

    #[test]
    fn test_empty_days_leaves_selector_unpopulated() {
        let mut session = CalendarSession::new();
        let mut port = Snapshot::default();
        let err = session
            .load(&MemorySource(r#"{"days": {}}"#), &mut port)
            .unwrap_err();
        assert!(matches!(err, CadenceError::EmptyData(_)));
        assert_eq!(session.state(), SessionState::LoadFailed);
        assert_eq!(port, Snapshot::default());
    }

    #[test]
    fn test_load_failed_is_terminal() {
        let mut session = CalendarSession::new();
        let mut port = Snapshot::default();
        assert!(session.load(&MemorySource("nope"), &mut port).is_err());
        let err = session
            .load(&MemorySource(TWO_YEARS), &mut port)
            .unwrap_err();
        assert!(matches!(err, CadenceError::SessionFailed));
        assert!(matches!(
            session.select_year(2024, &mut port),
            Err(CadenceError::SessionFailed)
        ));
    }

    #[test]
    fn test_select_year_is_idempotent() {
        let (mut session, mut port) = loaded();
        session.select_year(2023, &mut port).unwrap();
        let first = (port.cells.clone(), port.labels.clone());
        session.select_year(2023, &mut port).unwrap();
        let second = (port.cells.clone(), port.labels.clone());
        assert_eq!(first, second);
        assert_eq!(session.current_year(), Some(2023));
    }

    #[test]
    fn test_select_unknown_year() {
        let (mut session, mut port) = loaded();
        let err = session.select_year(1999, &mut port).unwrap_err();
        assert!(matches!(err, CadenceError::UnknownYear(1999)));
        assert_eq!(session.current_year(), Some(2024));
    }

    #[test]
    fn test_activate_shows_panel_and_year_change_hides_it() {
        let (mut session, mut port) = loaded();
        assert!(session.activate("2024-03-01", &mut port).unwrap());
        assert!(port.panel_visible);
        let panel = port.panel.clone().unwrap();
        assert_eq!(panel.net.text, "-12.50");
        assert_eq!(panel.statements[0].amount.text, "-3.20");

        session.select_year(2023, &mut port).unwrap();
        assert!(!port.panel_visible);
    }

    #[test]
    fn test_empty_cell_is_not_interactive() {
        let (session, mut port) = loaded();
        assert!(!session.activate("2024-03-02", &mut port).unwrap());
        // Another year's entry is not reachable from the current grid.
        assert!(!session.activate("2023-05-10", &mut port).unwrap());
        assert!(!port.panel_visible);
    }

    #[test]
    fn test_activate_before_load() {
        let session = CalendarSession::new();
        let mut port = Snapshot::default();
        assert!(matches!(
            session.activate("2024-03-01", &mut port),
            Err(CadenceError::NotLoaded)
        ));
    }

    #[test]
    fn test_second_load_rejected() {
        let (mut session, mut port) = loaded();
        assert!(session.load(&MemorySource(TWO_YEARS), &mut port).is_err());
        assert_eq!(session.current_year(), Some(2024));
    }
}

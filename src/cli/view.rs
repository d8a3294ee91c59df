use std::io::IsTerminal;

use crate::cli::open_session;
use crate::error::Result;
use crate::render::{text, Snapshot};
use crate::tui::run_view;
use crate::viewer::CalendarViewer;

pub fn run(file: Option<String>, year: Option<i32>) -> Result<()> {
    let mut snap = Snapshot::default();
    let mut session = open_session(file, &mut snap)?;
    if let Some(year) = year {
        session.select_year(year, &mut snap)?;
    }

    if std::io::stdout().is_terminal() {
        let mut viewer = CalendarViewer::new(session, snap);
        run_view(&mut viewer)
    } else {
        // Non-TTY: plain text to stdout
        print!("{}", text::render(&snap));
        Ok(())
    }
}

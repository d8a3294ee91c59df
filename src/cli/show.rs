use crate::cli::open_session;
use crate::error::{CadenceError, Result};
use crate::index::year_of;
use crate::render::{text, Snapshot};

pub fn run(date: &str, file: Option<String>) -> Result<()> {
    let year = year_of(date)
        .ok_or_else(|| CadenceError::Other(format!("Invalid date {date:?}, expected YYYY-MM-DD")))?;

    let mut snap = Snapshot::default();
    let mut session = open_session(file, &mut snap)?;
    session.select_year(year, &mut snap)?;
    if !session.activate(date, &mut snap)? {
        return Err(CadenceError::Other(format!("No data for {date}")));
    }

    if let Some(panel) = snap.visible_panel() {
        println!("{}", text::format_panel(panel));
    }
    Ok(())
}

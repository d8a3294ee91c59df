use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{CadenceError, Result};
use crate::models::{CalendarDocument, DayEntry};

/// Date string → entry, as found under the document's `days` field.
pub type Days = BTreeMap<String, DayEntry>;

/// Where a session gets its calendar document from.
pub trait CalendarSource {
    /// Human-readable location, used in diagnostics.
    fn location(&self) -> String;

    /// Fetch and parse the document. Network-style failures and malformed
    /// JSON are `LoadFailure`; a missing or empty `days` field is `EmptyData`.
    fn fetch(&self) -> Result<Days>;
}

/// Reads `calendar.json` (or another path) from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Days> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| CadenceError::LoadFailure {
                path: self.location(),
                reason: e.to_string(),
            })?;
        parse_document(&content, &self.location())
    }
}

pub fn parse_document(content: &str, location: &str) -> Result<Days> {
    let doc: CalendarDocument =
        serde_json::from_str(content).map_err(|e| CadenceError::LoadFailure {
            path: location.to_string(),
            reason: e.to_string(),
        })?;
    match doc.days {
        Some(days) if !days.is_empty() => Ok(days),
        _ => Err(CadenceError::EmptyData(location.to_string())),
    }
}

/// Load a calendar file without a session, for one-shot commands.
pub fn load_days(path: &Path) -> Result<Days> {
    let source = FileSource::new(path);
    let days = source.fetch()?;
    log::info!("loaded {} days from {}", days.len(), source.location());
    Ok(days)
}

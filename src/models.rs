use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Red,
}

impl StatusColor {
    /// Zero counts as green.
    pub fn for_net(net: f64) -> Self {
        if net >= 0.0 {
            Self::Green
        } else {
            Self::Red
        }
    }
}

/// One line of a day's detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub desc: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// One calendar day's summary as written to `calendar.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: String,
    pub status_color: StatusColor,
    pub net_daily_avg: f64,
    #[serde(default)]
    pub statements: Vec<StatementLine>,
}

/// The `calendar.json` document. `days` is optional so that a missing field
/// can be reported as empty data rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub days: Option<BTreeMap<String, DayEntry>>,
}

/// A single bank statement row.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub date: NaiveDate,
    pub amount: f64,
    pub desc: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_entry_parses_viewer_shape() {
        let json = r#"{
            "date": "2024-03-01",
            "status_color": "red",
            "net_daily_avg": -12.5,
            "statements": [{"desc": "Coffee", "amount": -3.2}]
        }"#;
        let entry: DayEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.status_color, StatusColor::Red);
        assert_eq!(entry.statements.len(), 1);
        assert!(!entry.statements[0].is_recurring);
        assert_eq!(entry.statements[0].date, None);
    }

    #[test]
    fn test_day_entry_accepts_producer_fields() {
        let json = r#"{
            "date": "2024-03-01",
            "status_color": "green",
            "net_daily_avg": 40.0,
            "statements": [{"date": "2024-03-01", "desc": "PAYROLL", "amount": 40.0, "is_recurring": true}]
        }"#;
        let entry: DayEntry = serde_json::from_str(json).unwrap();
        assert!(entry.statements[0].is_recurring);
        assert_eq!(entry.statements[0].date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_missing_days_field() {
        let doc: CalendarDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.days.is_none());
    }

    #[test]
    fn test_status_color_for_net() {
        assert_eq!(StatusColor::for_net(0.0), StatusColor::Green);
        assert_eq!(StatusColor::for_net(-0.01), StatusColor::Red);
        assert_eq!(
            serde_json::to_string(&StatusColor::Green).unwrap(),
            "\"green\""
        );
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::Statement;

/// Statements sharing a normalized description.
pub type Groups = BTreeMap<String, Vec<Statement>>;

/// Uppercase, strip digits, collapse whitespace. Check numbers, dates and
/// reference codes differ between otherwise identical deposits.
pub fn normalize_desc(desc: &str) -> String {
    let stripped: String = desc
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_deposit(stmt: &Statement) -> bool {
    stmt.amount >= 0.0
}

pub fn is_withdrawal(stmt: &Statement) -> bool {
    stmt.amount < 0.0
}

/// Imported statements grouped by date, file order kept within a day.
#[derive(Debug, Clone, Default)]
pub struct Statements {
    by_day: BTreeMap<NaiveDate, Vec<Statement>>,
}

impl Statements {
    pub fn from_rows(rows: Vec<Statement>) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<Statement>> = BTreeMap::new();
        for row in rows {
            by_day.entry(row.date).or_default().push(row);
        }
        Self { by_day }
    }

    pub fn daily(&self) -> &BTreeMap<NaiveDate, Vec<Statement>> {
        &self.by_day
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.by_day.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    /// Date of the most recent statement; the builder amortizes up to here.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.by_day.keys().next_back().copied()
    }

    pub fn discover_candidates(&self, filter: impl Fn(&Statement) -> bool) -> Groups {
        let mut groups = Groups::new();
        for stmt in self.iter().filter(|s| filter(s)) {
            groups
                .entry(normalize_desc(&stmt.desc))
                .or_default()
                .push(stmt.clone());
        }
        groups
    }
}

pub fn discover_signals(candidates: &Groups, predicate: impl Fn(&[Statement]) -> bool) -> Groups {
    candidates
        .iter()
        .filter(|(_, stmts)| predicate(stmts))
        .map(|(desc, stmts)| (desc.clone(), stmts.clone()))
        .collect()
}

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::fmt::round_cents;
use crate::grid::format_iso;
use crate::models::{CalendarDocument, DayEntry, Statement, StatementLine, StatusColor};
use crate::recurrence::{aggregate_daily, is_recurring};
use crate::statements::{discover_signals, is_deposit, normalize_desc, Groups, Statements};

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub threshold: f64,
    pub forward_weekends: bool,
}

/// Deposit groups and the subset that scored as recurring.
pub struct Discovery {
    pub candidates: Groups,
    pub signals: Groups,
}

pub fn discover_recurring_deposits(stmts: &Statements, threshold: f64) -> Discovery {
    let candidates = stmts.discover_candidates(is_deposit);
    let signals = discover_signals(&candidates, |group| {
        is_recurring(&aggregate_daily(group), threshold)
    });
    log::info!(
        "{} of {} deposit groups look recurring",
        signals.len(),
        candidates.len()
    );
    Discovery { candidates, signals }
}

fn forward_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Spread each occurrence of a recurring deposit evenly over the days until
/// the next one. The last occurrence is spread through `end_date`.
pub fn amortize_signal(
    signal: &[Statement],
    end_date: NaiveDate,
    forward_weekends: bool,
) -> BTreeMap<NaiveDate, f64> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for stmt in signal {
        *totals.entry(stmt.date).or_default() += stmt.amount;
    }

    let mut spread: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut add = |day: NaiveDate, amount: f64| {
        let day = if forward_weekends { forward_weekend(day) } else { day };
        *spread.entry(day).or_default() += amount;
    };

    let occurrences: Vec<(NaiveDate, f64)> = totals.into_iter().collect();
    for pair in occurrences.windows(2) {
        let (start, total) = pair[0];
        let (next, _) = pair[1];
        let span = (next - start).num_days();
        let per_day = total / span as f64;
        for day in start.iter_days().take(span as usize) {
            add(day, per_day);
        }
    }

    if let Some(&(last, total)) = occurrences.last() {
        if end_date > last {
            let days = (end_date - last).num_days() + 1;
            let per_day = total / days as f64;
            for day in last.iter_days().take(days as usize) {
                add(day, per_day);
            }
        }
    }
    spread
}

#[derive(Default)]
struct DayAccumulator {
    net: f64,
    lines: Vec<StatementLine>,
}

/// Net every day's statements, replacing recurring lump sums with their
/// amortized daily share.
pub fn build_calendar(stmts: &Statements, signals: &Groups, forward_weekends: bool) -> CalendarDocument {
    let Some(end_date) = stmts.end_date() else {
        return CalendarDocument::default();
    };

    let recurring: HashSet<(NaiveDate, String)> = signals
        .values()
        .flatten()
        .map(|s| (s.date, normalize_desc(&s.desc)))
        .collect();

    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for (name, signal) in signals {
        for (day, amount) in amortize_signal(signal, end_date, forward_weekends) {
            let acc = days.entry(day).or_default();
            acc.net += amount;
            acc.lines.push(StatementLine {
                desc: format!("(amortized) {name}"),
                amount,
                date: Some(format_iso(day)),
                is_recurring: true,
            });
        }
    }

    for (day, day_stmts) in stmts.daily() {
        let acc = days.entry(*day).or_default();
        for stmt in day_stmts {
            let is_recurring = recurring.contains(&(stmt.date, normalize_desc(&stmt.desc)));
            if !is_recurring {
                acc.net += stmt.amount;
            }
            acc.lines.push(StatementLine {
                desc: stmt.desc.clone(),
                amount: stmt.amount,
                date: Some(format_iso(stmt.date)),
                is_recurring,
            });
        }
    }

    let days: BTreeMap<String, DayEntry> = days
        .into_iter()
        .map(|(day, acc)| {
            let iso = format_iso(day);
            let net = round_cents(acc.net);
            let entry = DayEntry {
                date: iso.clone(),
                status_color: StatusColor::for_net(net),
                net_daily_avg: net,
                statements: acc.lines,
            };
            (iso, entry)
        })
        .collect();
    log::debug!("built {} calendar days through {end_date}", days.len());

    CalendarDocument { days: Some(days) }
}

/// Full producer pipeline: discover recurring deposits, then build the days.
pub fn build(stmts: &Statements, options: BuildOptions) -> (Discovery, CalendarDocument) {
    let discovery = discover_recurring_deposits(stmts, options.threshold);
    let doc = build_calendar(stmts, &discovery.signals, options.forward_weekends);
    (discovery, doc)
}

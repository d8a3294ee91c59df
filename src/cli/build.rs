use std::path::{Path, PathBuf};

use comfy_table::{Cell, CellAlignment, Table};

use crate::builder::{build, BuildOptions};
use crate::error::{CadenceError, Result};
use crate::fmt::money;
use crate::importer::import_wells_fargo;
use crate::recurrence::{aggregate_daily, recurrence_score};
use crate::settings::{calendar_path, load_settings};
use crate::statements::{is_deposit, is_withdrawal};

pub fn run(
    csv: &str,
    output: Option<String>,
    threshold: Option<f64>,
    no_forward_weekends: bool,
) -> Result<()> {
    let settings = load_settings();
    let options = BuildOptions {
        threshold: threshold.unwrap_or(settings.recurrence_threshold),
        forward_weekends: settings.forward_weekends && !no_forward_weekends,
    };
    if !(0.0..=1.0).contains(&options.threshold) {
        return Err(CadenceError::Other(format!(
            "Threshold must be between 0 and 1, got {}",
            options.threshold
        )));
    }

    let stmts = import_wells_fargo(Path::new(csv))?;
    if stmts.is_empty() {
        return Err(CadenceError::Other(format!("No statements found in {csv}")));
    }
    let deposits = stmts.iter().filter(|s| is_deposit(s)).count();
    let withdrawals = stmts.iter().filter(|s| is_withdrawal(s)).count();
    println!(
        "{} statements ({deposits} deposits, {withdrawals} withdrawals)",
        stmts.len()
    );

    let (discovery, doc) = build(&stmts, options);

    let mut table = Table::new();
    table.set_header(vec!["Deposit", "Count", "Total", "Score", "Recurring"]);
    for (desc, group) in &discovery.candidates {
        let daily = aggregate_daily(group);
        let total: f64 = group.iter().map(|s| s.amount).sum();
        let recurring = discovery.signals.contains_key(desc);
        table.add_row(vec![
            Cell::new(desc),
            Cell::new(daily.len()).set_alignment(CellAlignment::Right),
            Cell::new(money(total)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", recurrence_score(&daily))).set_alignment(CellAlignment::Right),
            Cell::new(if recurring { "yes" } else { "" }),
        ]);
    }
    if !discovery.candidates.is_empty() {
        println!("{table}");
    }

    let out_path = match output {
        Some(path) => PathBuf::from(path),
        None => calendar_path(None),
    };
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(&out_path, format!("{json}\n"))?;

    let day_count = doc.days.as_ref().map_or(0, |d| d.len());
    println!(
        "Wrote {day_count} days ({} recurring deposits amortized) to {}",
        discovery.signals.len(),
        out_path.display()
    );
    Ok(())
}

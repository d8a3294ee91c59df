use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::Statement;

pub const DEFAULT_THRESHOLD: f64 = 0.75;

const MIN_SAMPLES: usize = 3;
const FULL_CONFIDENCE_SAMPLES: f64 = 4.0;
/// Weekly, bi-weekly and monthly pay periods, in days.
const CADENCES: [f64; 3] = [7.0, 14.0, 30.0];

const CADENCE_TOLERANCE: f64 = 4.0;
const CADENCE_VARIANCE_TOLERANCE: f64 = 12.0;
const AMOUNT_CV_TOLERANCE: f64 = 0.12;

const CADENCE_WEIGHT: f64 = 0.3;
const AMOUNT_WEIGHT: f64 = 0.4;
const COUNT_WEIGHT: f64 = 0.3;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn pvariance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// How regular a group of statements looks, in [0, 1]. Combines how close
/// the gaps sit to a known pay cadence, how steady the amounts are, and how
/// many occurrences back it up.
pub fn recurrence_score(stmts: &[Statement]) -> f64 {
    if stmts.len() < MIN_SAMPLES {
        return 0.0;
    }
    let mut sorted: Vec<&Statement> = stmts.iter().collect();
    sorted.sort_by_key(|s| s.date);

    let deltas: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days() as f64)
        .collect();
    let med = median(&deltas);
    let cadence_error = CADENCES
        .iter()
        .map(|c| (med - c).abs())
        .fold(f64::INFINITY, f64::min);
    let cadence = (-cadence_error / CADENCE_TOLERANCE).exp()
        * (-pvariance(&deltas) / CADENCE_VARIANCE_TOLERANCE).exp();

    let amounts: Vec<f64> = sorted.iter().map(|s| s.amount.abs()).collect();
    let cv = pvariance(&amounts).sqrt() / (mean(&amounts) + 1e-6);
    let amount = (-cv / AMOUNT_CV_TOLERANCE).exp();

    let count = (sorted.len() as f64 / FULL_CONFIDENCE_SAMPLES).min(1.0);

    CADENCE_WEIGHT * cadence + AMOUNT_WEIGHT * amount + COUNT_WEIGHT * count
}

pub fn is_recurring(stmts: &[Statement], threshold: f64) -> bool {
    recurrence_score(stmts) >= threshold
}

/// One statement per date with the day's amounts summed. Split deposits on
/// the same day count as a single occurrence.
pub fn aggregate_daily(stmts: &[Statement]) -> Vec<Statement> {
    let mut by_day: BTreeMap<NaiveDate, Statement> = BTreeMap::new();
    for stmt in stmts {
        by_day
            .entry(stmt.date)
            .and_modify(|agg| agg.amount += stmt.amount)
            .or_insert_with(|| stmt.clone());
    }
    by_day.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(start: &str, step_days: &[i64], amounts: &[f64]) -> Vec<Statement> {
        let mut date = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let mut out = Vec::new();
        for (i, amount) in amounts.iter().enumerate() {
            if i > 0 {
                date += chrono::Duration::days(step_days[(i - 1) % step_days.len()]);
            }
            out.push(Statement {
                date,
                amount: *amount,
                desc: "ACME PAYROLL".to_string(),
            });
        }
        out
    }

    #[test]
    fn test_too_few_samples() {
        let two = series("2024-01-01", &[14], &[1000.0, 1000.0]);
        assert_eq!(recurrence_score(&two), 0.0);
        assert_eq!(recurrence_score(&[]), 0.0);
    }

    #[test]
    fn test_perfect_monthly_signal() {
        let stmts = series("2024-01-01", &[30], &[1500.0; 4]);
        assert!((recurrence_score(&stmts) - 1.0).abs() < 1e-6);
        assert!(is_recurring(&stmts, DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_three_biweekly_deposits() {
        let stmts = series("2024-01-05", &[14], &[2000.0; 3]);
        // cadence 1.0, amount 1.0, count 0.75
        assert!((recurrence_score(&stmts) - 0.925).abs() < 1e-6);
    }

    #[test]
    fn test_irregular_gaps_and_amounts_score_low() {
        let stmts = series("2024-01-01", &[3, 41, 9, 22], &[12.0, 480.0, 75.0, 3.5, 220.0]);
        let score = recurrence_score(&stmts);
        assert!(score < DEFAULT_THRESHOLD, "score {score}");
        assert!(!is_recurring(&stmts, DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut stmts = series("2024-01-01", &[14], &[900.0, 910.0, 905.0, 900.0]);
        let forward = recurrence_score(&stmts);
        stmts.reverse();
        assert_eq!(forward, recurrence_score(&stmts));
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[30.0, 14.0, 7.0]), 14.0);
        assert_eq!(median(&[7.0, 14.0, 30.0, 31.0]), 22.0);
    }

    #[test]
    fn test_aggregate_daily_sums_same_day() {
        let mut stmts = series("2024-01-01", &[0, 14], &[600.0, 400.0, 1000.0]);
        stmts[1].desc = "ACME PAYROLL BONUS".to_string();
        let agg = aggregate_daily(&stmts);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].amount, 1000.0);
        assert_eq!(agg[0].desc, "ACME PAYROLL");
        assert_eq!(agg[1].amount, 1000.0);
    }
}

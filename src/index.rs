use std::collections::{BTreeMap, HashMap};

use crate::loader::Days;
use crate::models::DayEntry;

/// Year → (ISO date → entry).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarIndex {
    by_year: HashMap<i32, BTreeMap<String, DayEntry>>,
    /// Entries whose key has no readable year. Kept so nothing loaded is
    /// lost, but no grid ever shows them.
    undated: BTreeMap<String, DayEntry>,
}

/// Calendar year of an ISO date string, read from the text before the first
/// `-`. Malformed strings are not validated beyond this.
pub fn year_of(date: &str) -> Option<i32> {
    date.split('-').next()?.trim().parse().ok()
}

/// Group every day by the year parsed from its own date key. The caller's
/// partitioning, if any, is ignored. Keys without a readable year land in
/// the undated bucket.
pub fn group_by_year(days: &Days) -> CalendarIndex {
    let mut by_year: HashMap<i32, BTreeMap<String, DayEntry>> = HashMap::new();
    let mut undated = BTreeMap::new();
    for (date, entry) in days {
        match year_of(date) {
            Some(year) => {
                by_year
                    .entry(year)
                    .or_default()
                    .insert(date.clone(), entry.clone());
            }
            None => {
                log::warn!("day {date:?} has no readable year and will not be shown");
                undated.insert(date.clone(), entry.clone());
            }
        }
    }
    CalendarIndex { by_year, undated }
}

impl CalendarIndex {
    /// Years present, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.by_year.keys().copied().collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.by_year.keys().copied().max()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.by_year.contains_key(&year)
    }

    pub fn days_in(&self, year: i32) -> Option<&BTreeMap<String, DayEntry>> {
        self.by_year.get(&year)
    }

    pub fn undated(&self) -> &BTreeMap<String, DayEntry> {
        &self.undated
    }

    /// Every indexed entry, undated ones included.
    pub fn len(&self) -> usize {
        self.by_year.values().map(|d| d.len()).sum::<usize>() + self.undated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusColor;

    fn entry(date: &str, net: f64) -> DayEntry {
        DayEntry {
            date: date.to_string(),
            status_color: StatusColor::for_net(net),
            net_daily_avg: net,
            statements: vec![],
        }
    }

    fn days(dates: &[&str]) -> Days {
        dates
            .iter()
            .map(|d| (d.to_string(), entry(d, 1.0)))
            .collect()
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("2024-02-29"), Some(2024));
        assert_eq!(year_of("1999-12-31"), Some(1999));
        assert_eq!(year_of("garbage"), None);
    }

    #[test]
    fn test_every_entry_in_exactly_one_bucket() {
        let input = days(&[
            "2022-12-31",
            "2023-01-01",
            "2023-06-15",
            "2024-02-29",
            "1987-07-04",
        ]);
        let index = group_by_year(&input);
        assert_eq!(index.len(), input.len());

        for date in input.keys() {
            let year = year_of(date).unwrap();
            let holders: Vec<i32> = index
                .years()
                .into_iter()
                .filter(|y| index.days_in(*y).unwrap().contains_key(date))
                .collect();
            assert_eq!(holders, vec![year], "{date} misplaced");
        }
    }

    #[test]
    fn test_years_descending() {
        let index = group_by_year(&days(&["2021-01-01", "2024-05-05", "2023-03-03"]));
        assert_eq!(index.years(), vec![2024, 2023, 2021]);
        assert_eq!(index.latest_year(), Some(2024));
    }

    #[test]
    fn test_year_derived_from_key_not_entry() {
        let mut input = Days::new();
        // The entry's own date field disagrees; the key decides.
        input.insert("2020-01-01".to_string(), entry("2030-01-01", 1.0));
        let index = group_by_year(&input);
        assert!(index.contains_year(2020));
        assert!(!index.contains_year(2030));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = days(&["2024-01-01"]);
        let before = input.clone();
        let _ = group_by_year(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_days_in_by_year() {
        let index = group_by_year(&days(&["2024-01-01"]));
        let bucket = index.days_in(2024).unwrap();
        assert!(bucket.contains_key("2024-01-01"));
        assert!(!bucket.contains_key("2024-01-02"));
        assert!(index.days_in(2023).is_none());
    }

    #[test]
    fn test_unreadable_key_is_kept_not_dropped() {
        let input = days(&["2024-01-01", "Jan 2 2024"]);
        let index = group_by_year(&input);
        assert_eq!(index.len(), 2);
        assert_eq!(index.years(), vec![2024]);
        assert!(index.undated().contains_key("Jan 2 2024"));
        assert_eq!(index.days_in(2024).unwrap().len(), 1);
    }
}

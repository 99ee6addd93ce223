//! Day-plan drafts: the editable output of classification, before reconciliation.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::month_start;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlanDraft {
    pub date: NaiveDate,
    pub raw_text: String,
    pub shift_name: String,
}

impl DayPlanDraft {
    pub fn new(
        date: NaiveDate,
        raw_text: impl Into<String>,
        shift_name: impl Into<String>,
    ) -> Self {
        Self {
            date,
            raw_text: raw_text.into(),
            shift_name: shift_name.into(),
        }
    }
}

/// Assign `shift_name` to every draft dated within `range`. Returns how many changed.
pub fn reassign_range(
    drafts: &mut [DayPlanDraft],
    range: RangeInclusive<NaiveDate>,
    shift_name: &str,
) -> usize {
    let mut changed = 0;
    for d in drafts.iter_mut().filter(|d| range.contains(&d.date)) {
        if d.shift_name != shift_name {
            d.shift_name = shift_name.to_string();
            changed += 1;
        }
    }
    changed
}

/// Group drafts into one batch per calendar month, months ascending,
/// preserving input order inside each batch.
pub fn split_by_month(drafts: Vec<DayPlanDraft>) -> Vec<Vec<DayPlanDraft>> {
    let mut by_month: BTreeMap<NaiveDate, Vec<DayPlanDraft>> = BTreeMap::new();
    for d in drafts {
        by_month.entry(month_start(d.date)).or_default().push(d);
    }
    by_month.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_reassign_range_inclusive() {
        let mut drafts: Vec<_> = (1..=5).map(|d| DayPlanDraft::new(day(5, d), "", "A")).collect();
        let changed = reassign_range(&mut drafts, day(5, 2)..=day(5, 4), "D");
        assert_eq!(changed, 3);
        let names: Vec<_> = drafts.iter().map(|d| d.shift_name.as_str()).collect();
        assert_eq!(names, vec!["A", "D", "D", "D", "A"]);
    }

    #[test]
    fn test_split_by_month() {
        let drafts = vec![
            DayPlanDraft::new(day(6, 1), "", "A"),
            DayPlanDraft::new(day(5, 31), "", "C"),
            DayPlanDraft::new(day(6, 2), "", "D"),
        ];
        let batches = split_by_month(drafts);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].date, day(5, 31));
        let names: Vec<_> = batches[1].iter().map(|d| d.shift_name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
    }
}

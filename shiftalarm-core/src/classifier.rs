//! Keyword-based shift classification.
//!
//! Matching strips all whitespace from the recognized text, then walks the catalog in
//! order and each shift's keywords in order; the first keyword contained in the text
//! decides the shift.

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::ShiftCatalog;
use crate::drafts::DayPlanDraft;
use crate::recognition::MonthRecognition;

/// What to return when no keyword matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fallback {
    /// The first shift in the catalog (compatible default).
    #[default]
    FirstShift,
    /// A sentinel label that resolves to no shift, so the day gets no alarms.
    Unclassified(String),
}

#[derive(Debug, Clone)]
pub struct ShiftClassifier<'a> {
    catalog: &'a ShiftCatalog,
    fallback: Fallback,
}

impl<'a> ShiftClassifier<'a> {
    pub fn new(catalog: &'a ShiftCatalog) -> Self {
        Self {
            catalog,
            fallback: Fallback::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Keyword match only; `None` when nothing in the catalog matches.
    pub fn find_match(&self, text: &str) -> Option<&'a str> {
        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        self.catalog
            .shifts()
            .iter()
            .find(|shift| {
                shift
                    .keywords
                    .iter()
                    .any(|k| !k.is_empty() && stripped.contains(k.as_str()))
            })
            .map(|shift| shift.name.as_str())
    }

    /// Shift name for a day's recognized text, applying the fallback on no match.
    /// Empty only when the catalog is empty and the fallback is `FirstShift`.
    pub fn classify(&self, text: &str) -> String {
        if let Some(name) = self.find_match(text) {
            return name.to_string();
        }
        let fallback = match &self.fallback {
            Fallback::FirstShift => self
                .catalog
                .first()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            Fallback::Unclassified(label) => label.clone(),
        };
        debug!(text, fallback = %fallback, "no keyword matched");
        fallback
    }

    /// Turn a recognized month into drafts sorted by date.
    /// Entries whose day does not exist in the month are dropped.
    pub fn map_to_drafts(&self, result: &MonthRecognition) -> Vec<DayPlanDraft> {
        let mut drafts: Vec<DayPlanDraft> = result
            .entries
            .iter()
            .filter_map(|entry| {
                let Some(date) = NaiveDate::from_ymd_opt(result.year, result.month, entry.day)
                else {
                    debug!(
                        year = result.year,
                        month = result.month,
                        day = entry.day,
                        "skipping impossible date"
                    );
                    return None;
                };
                let shift_name = self.classify(&entry.raw_text);
                Some(DayPlanDraft::new(date, entry.raw_text.clone(), shift_name))
            })
            .collect();
        drafts.sort_by_key(|d| d.date);
        drafts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ShiftType, default_catalog};
    use crate::recognition::DayEntry;
    use crate::settings::AlarmDefaults;

    fn catalog() -> ShiftCatalog {
        default_catalog(&AlarmDefaults::default())
    }

    #[test]
    fn test_keyword_hit() {
        let c = catalog();
        let cls = ShiftClassifier::new(&c);
        assert_eq!(cls.classify("A班9-18"), "A");
        assert_eq!(cls.classify("D 班"), "D");
        assert_eq!(cls.classify("节 假 日"), "休");
    }

    #[test]
    fn test_no_match_falls_back_to_first_shift() {
        let c = catalog();
        assert_eq!(ShiftClassifier::new(&c).classify("早班"), "A");
        assert_eq!(ShiftClassifier::new(&c).classify(""), "A");
    }

    #[test]
    fn test_unclassified_sentinel() {
        let c = catalog();
        let cls = ShiftClassifier::new(&c).with_fallback(Fallback::Unclassified("?".into()));
        assert_eq!(cls.classify("早班"), "?");
        assert_eq!(cls.find_match("早班"), None);
    }

    #[test]
    fn test_catalog_order_beats_keyword_order() {
        // "C" appears before "休" in the catalog, so "C休" resolves to C.
        let c = catalog();
        assert_eq!(ShiftClassifier::new(&c).classify("C休"), "C");

        let mut reordered = catalog();
        reordered.reorder("休", 0).unwrap();
        assert_eq!(ShiftClassifier::new(&reordered).classify("C休"), "休");
    }

    #[test]
    fn test_empty_catalog_yields_empty_name() {
        let c = ShiftCatalog::default();
        assert_eq!(ShiftClassifier::new(&c).classify("A班"), "");
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let mut s = ShiftType::new("X", "09:00", "17:00", "").unwrap();
        s.keywords.push(String::new());
        let y = ShiftType::new("Y", "09:00", "17:00", "Y").unwrap();
        let c = ShiftCatalog::new(vec![s, y]).unwrap();
        assert_eq!(ShiftClassifier::new(&c).find_match("Y"), Some("Y"));
    }

    #[test]
    fn test_map_to_drafts_sorts_and_skips_impossible_days() {
        let c = catalog();
        let result = MonthRecognition {
            year: 2024,
            month: 4,
            entries: vec![
                DayEntry { day: 3, raw_text: "D班".into(), confidence: 0.9 },
                DayEntry { day: 31, raw_text: "A班".into(), confidence: 0.9 },
                DayEntry { day: 1, raw_text: "公休".into(), confidence: 0.8 },
            ],
        };
        let drafts = ShiftClassifier::new(&c).map_to_drafts(&result);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(drafts[0].shift_name, "休");
        assert_eq!(drafts[1].shift_name, "D");
        assert_eq!(drafts[1].raw_text, "D班");
    }
}

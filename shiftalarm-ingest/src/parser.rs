//! Recognition result parser: loose text fragments -> month + per-day text.
//!
//! A calendar cell holds the day number with its shift text written above it, so each
//! day-number fragment collects the non-numeric fragments sitting in the same column
//! and higher on the page.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use shiftalarm_core::{DayEntry, MonthRecognition};
use tracing::debug;

use crate::types::{BoxOrigin, Fragment};

/// Geometry tolerances, as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Max horizontal distance between centers to count as the same column.
    pub column_tolerance: f64,
    /// Min vertical distance a fragment's center must sit above the day number's.
    pub row_tolerance: f64,
    pub origin: BoxOrigin,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            column_tolerance: 0.08,
            row_tolerance: 0.01,
            origin: BoxOrigin::TopLeft,
        }
    }
}

/// Find the first `YYYY年M月` header across fragment texts.
pub fn parse_year_month<'a>(texts: impl IntoIterator<Item = &'a str>) -> Option<(i32, u32)> {
    let re = Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月").ok()?;
    for text in texts {
        let Some(caps) = re.captures(text) else { continue };
        let (Ok(year), Ok(month)) = (caps[1].parse::<i32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if (1..=12).contains(&month) {
            return Some((year, month));
        }
    }
    None
}

fn day_number(text: &str) -> Option<u32> {
    text.parse::<i64>()
        .ok()
        .filter(|n| (1..=31).contains(n))
        .map(|n| n as u32)
}

fn is_integer(text: &str) -> bool {
    text.parse::<i64>().is_ok()
}

/// Parse fragments into a month result. `today` supplies the year/month when no header
/// is found. Fragment text is trimmed first; an empty input yields no entries.
pub fn parse_fragments(
    fragments: &[Fragment],
    config: &ParserConfig,
    today: NaiveDate,
) -> MonthRecognition {
    let trimmed: Vec<Fragment> = fragments
        .iter()
        .map(|f| Fragment::new(f.text.trim(), f.confidence, f.bbox))
        .collect();

    let (year, month) = parse_year_month(trimmed.iter().map(|f| f.text.as_str()))
        .unwrap_or_else(|| {
            debug!("no year/month header found, using today");
            (today.year(), today.month())
        });

    let mut entries = Vec::new();
    for candidate in &trimmed {
        let Some(day) = day_number(&candidate.text) else { continue };
        let (cx, cy) = (candidate.bbox.mid_x(), candidate.bbox.mid_y());

        let nearby: Vec<&str> = trimmed
            .iter()
            .filter(|f| !is_integer(&f.text))
            .filter(|f| (f.bbox.mid_x() - cx).abs() < config.column_tolerance)
            .filter(|f| {
                let dy = f.bbox.mid_y() - cy;
                match config.origin {
                    BoxOrigin::TopLeft => dy < -config.row_tolerance,
                    BoxOrigin::BottomLeft => dy > config.row_tolerance,
                }
            })
            .map(|f| f.text.as_str())
            .collect();

        entries.push(DayEntry {
            day,
            raw_text: nearby.join(" "),
            confidence: candidate.confidence,
        });
    }

    debug!(year, month, entries = entries.len(), "parsed recognition fragments");
    MonthRecognition { year, month, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn frag(text: &str, conf: f32, x: f64, y: f64) -> Fragment {
        Fragment::new(text, conf, BoundingBox::new(x, y, 0.04, 0.02))
    }

    #[test]
    fn test_header_day_and_text_above() {
        let fragments = vec![
            frag("2024年5月", 0.9, 0.40, 0.02),
            frag("15", 0.95, 0.30, 0.50),
            frag("A班", 0.9, 0.30, 0.46),
        ];
        let r = parse_fragments(&fragments, &ParserConfig::default(), today());
        assert_eq!((r.year, r.month), (2024, 5));
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].day, 15);
        assert_eq!(r.entries[0].raw_text, "A班");
        assert_eq!(r.entries[0].confidence, 0.95);
    }

    #[test]
    fn test_text_below_or_beside_is_ignored() {
        let fragments = vec![
            frag("15", 0.95, 0.30, 0.50),
            frag("below", 0.9, 0.30, 0.54),
            frag("same-row", 0.9, 0.30, 0.505),
            frag("next-col", 0.9, 0.45, 0.46),
        ];
        let r = parse_fragments(&fragments, &ParserConfig::default(), today());
        assert_eq!(r.entries[0].raw_text, "");
    }

    #[test]
    fn test_bottom_left_origin_flips_above() {
        let config = ParserConfig { origin: BoxOrigin::BottomLeft, ..Default::default() };
        let fragments = vec![
            frag("15", 0.95, 0.30, 0.50),
            frag("D班", 0.9, 0.30, 0.54),
            frag("noise", 0.9, 0.30, 0.46),
        ];
        let r = parse_fragments(&fragments, &config, today());
        assert_eq!(r.entries[0].raw_text, "D班");
    }

    #[test]
    fn test_joins_in_source_order() {
        let fragments = vec![
            frag("9-18", 0.9, 0.31, 0.44),
            frag("3", 0.9, 0.30, 0.50),
            frag("A班", 0.9, 0.29, 0.47),
        ];
        let r = parse_fragments(&fragments, &ParserConfig::default(), today());
        assert_eq!(r.entries[0].raw_text, "9-18 A班");
    }

    #[test]
    fn test_numbers_are_never_shift_text() {
        let fragments = vec![
            frag("8", 0.9, 0.30, 0.50),
            frag("1", 0.9, 0.30, 0.40),
            frag("45", 0.9, 0.30, 0.30),
        ];
        let r = parse_fragments(&fragments, &ParserConfig::default(), today());
        assert_eq!(r.entries.len(), 2);
        assert!(r.entries.iter().all(|e| e.raw_text.is_empty()));
    }

    #[test]
    fn test_out_of_range_numbers_and_duplicates() {
        let fragments = vec![
            frag("0", 0.9, 0.1, 0.5),
            frag("32", 0.9, 0.2, 0.5),
            frag(" 7 ", 0.8, 0.3, 0.5),
            frag("7", 0.6, 0.6, 0.5),
        ];
        let r = parse_fragments(&fragments, &ParserConfig::default(), today());
        assert_eq!(r.entries.iter().map(|e| e.day).collect::<Vec<_>>(), vec![7, 7]);
    }

    #[test]
    fn test_falls_back_to_today() {
        let r = parse_fragments(&[], &ParserConfig::default(), today());
        assert_eq!((r.year, r.month), (2026, 3));
        assert!(r.entries.is_empty());
    }

    #[test]
    fn test_parse_year_month_variants() {
        assert_eq!(parse_year_month(["排班表 2024 年 11 月"]), Some((2024, 11)));
        assert_eq!(parse_year_month(["2024年13月", "2025年1月"]), Some((2025, 1)));
        assert_eq!(parse_year_month(["2024年", "5月"]), None);
    }
}

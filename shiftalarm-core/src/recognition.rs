//! Structured output of schedule recognition, consumed by the classifier.

use serde::{Deserialize, Serialize};

/// One calendar cell: the day number and the text found above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: u32,
    /// Nearby fragments joined with single spaces, in source order.
    pub raw_text: String,
    /// Confidence of the day-number fragment, 0..=1.
    pub confidence: f32,
}

/// A recognized month grid. Entries are not deduplicated by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecognition {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<DayEntry>,
}

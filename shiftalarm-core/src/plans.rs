//! Persisted records: one day-plan per date, and concrete alarm instances.
//!
//! An alarm remembers the day-plan date it was derived from; reconciliation selects
//! alarms by that date, not by their own fire time.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag for day-plans produced by schedule recognition.
pub const SOURCE_OCR: &str = "OCR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub id: Uuid,
    pub date: NaiveDate,
    pub source: String,
    pub shift_name: String,
}

impl DayPlan {
    pub fn new(date: NaiveDate, source: impl Into<String>, shift_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            source: source.into(),
            shift_name: shift_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmInstance {
    pub id: Uuid,
    /// Shift day this alarm was derived from. Can differ from `date_time`'s date for
    /// overnight clock-outs and early wake-ups.
    pub plan_date: NaiveDate,
    /// Wall-clock fire time, no timezone.
    pub date_time: NaiveDateTime,
    pub label: String,
    pub enabled: bool,
    /// Identifier handed to the external alarm scheduler.
    pub scheduler_id: String,
    pub shift_name: String,
}

impl AlarmInstance {
    pub fn new(
        plan_date: NaiveDate,
        date_time: NaiveDateTime,
        label: impl Into<String>,
        shift_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan_date,
            date_time,
            label: label.into(),
            enabled: true,
            scheduler_id: Uuid::new_v4().to_string(),
            shift_name: shift_name.into(),
        }
    }
}

//! Alarm derivation: shift type + calendar day -> concrete alarm instances.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeDelta};
use tracing::warn;

use crate::catalog::{AlarmAnchor, ShiftType};
use crate::plans::AlarmInstance;

/// Concrete start/end of one shift occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftWindow {
    /// Place `shift` on `date`. An end at or before the start moves to the next day.
    pub fn resolve(shift: &ShiftType, date: NaiveDate) -> Self {
        let start = date.and_time(shift.start);
        let mut end = date.and_time(shift.end);
        if end <= start {
            end += Duration::days(1);
        }
        Self { start, end }
    }

    pub fn anchor(&self, anchor: AlarmAnchor) -> NaiveDateTime {
        match anchor {
            AlarmAnchor::Start => self.start,
            AlarmAnchor::End => self.end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One alarm per enabled template, offset from its anchor. Rest shifts yield nothing.
///
/// Each instance gets a fresh scheduler id and its own copy of the template label.
/// Templates whose offset overflows the calendar are skipped.
pub fn derive_alarms(shift: &ShiftType, date: NaiveDate) -> Vec<AlarmInstance> {
    if shift.is_rest() {
        return vec![];
    }

    let window = ShiftWindow::resolve(shift, date);
    shift
        .templates
        .iter()
        .filter(|t| t.enabled)
        .filter_map(|t| {
            let at = TimeDelta::try_minutes(t.offset_minutes)
                .and_then(|offset| window.anchor(t.anchor).checked_add_signed(offset));
            let Some(at) = at else {
                warn!(
                    shift = %shift.name,
                    label = %t.label,
                    offset_minutes = t.offset_minutes,
                    "alarm offset out of range, template skipped"
                );
                return None;
            };
            Some(AlarmInstance::new(date, at, t.label.clone(), shift.name.clone()))
        })
        .collect()
}

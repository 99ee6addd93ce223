//! Default alarm offsets applied to newly seeded shifts.

use serde::{Deserialize, Serialize};

use crate::catalog::{AlarmAnchor, AlarmTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmDefaults {
    pub wake_offset_minutes: i64,
    pub start_offset_minutes: i64,
    pub end_offset_minutes: i64,
}

impl Default for AlarmDefaults {
    fn default() -> Self {
        Self {
            wake_offset_minutes: -90,
            start_offset_minutes: -10,
            end_offset_minutes: 10,
        }
    }
}

impl AlarmDefaults {
    /// Wake-up, clock-in and clock-out templates.
    pub fn templates(&self) -> Vec<AlarmTemplate> {
        vec![
            AlarmTemplate::new("起床", AlarmAnchor::Start, self.wake_offset_minutes),
            AlarmTemplate::new("上班卡", AlarmAnchor::Start, self.start_offset_minutes),
            AlarmTemplate::new("下班卡", AlarmAnchor::End, self.end_offset_minutes),
        ]
    }
}

//! Scheduler that appends every call to a JSONL queue for a platform bridge to drain.

use serde::{Deserialize, Serialize};
use shiftalarm_core::{AlarmInstance, AlarmScheduler, SchedulerCall, SchedulerError};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedCall {
    pub queued_at_utc: String,
    pub call: SchedulerCall,
}

#[derive(Debug, Clone)]
pub struct QueueScheduler {
    path: PathBuf,
}

impl QueueScheduler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, call: SchedulerCall) -> Result<(), SchedulerError> {
        let reject = |e: &dyn std::fmt::Display| SchedulerError::Rejected(e.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| reject(&e))?;
        }
        let line = serde_json::to_string(&QueuedCall {
            queued_at_utc: chrono::Utc::now().to_rfc3339(),
            call,
        })
        .map_err(|e| reject(&e))?;

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| reject(&e))?;
        writeln!(f, "{}", line).map_err(|e| reject(&e))
    }
}

impl AlarmScheduler for QueueScheduler {
    fn schedule(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        self.append(SchedulerCall::Schedule(alarm.clone()))
    }

    fn cancel(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        self.append(SchedulerCall::Cancel(alarm.clone()))
    }
}

/// Read queued calls; unreadable lines are skipped.
pub fn read_queue(path: &Path) -> anyhow::Result<Vec<QueuedCall>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let f = fs::File::open(path)?;
    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(v) = serde_json::from_str::<QueuedCall>(&line) {
            out.push(v);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_calls_are_appended_in_order() {
        let dir = std::env::temp_dir().join(format!("shiftalarm-queue-{}", std::process::id()));
        let path = dir.join("calls.jsonl");
        let q = QueueScheduler::new(&path);

        let at = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(8, 50, 0).unwrap();
        let alarm = AlarmInstance::new(at.date(), at, "上班卡", "A");
        q.cancel(&alarm).unwrap();
        q.schedule(&alarm).unwrap();

        let calls = read_queue(&path).unwrap();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0].call, SchedulerCall::Cancel(_)));
        assert_eq!(calls[1].call.alarm().scheduler_id, alarm.scheduler_id);

        fs::remove_dir_all(&dir).ok();
    }
}

//! External alarm scheduler contract.
//!
//! Calls are fire-and-forget from the reconciler's point of view: failures are logged
//! and handed back as pending calls, never surfaced as errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SchedulerError, StoreResult};
use crate::plans::AlarmInstance;
use crate::store::Store;
use crate::time::month_range;

pub trait AlarmScheduler {
    fn schedule(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError>;
    fn cancel(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError>;
}

impl<T: AlarmScheduler + ?Sized> AlarmScheduler for &T {
    fn schedule(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        (**self).schedule(alarm)
    }

    fn cancel(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        (**self).cancel(alarm)
    }
}

/// Scheduler for platforms without system alarm support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScheduler;

impl AlarmScheduler for NoopScheduler {
    fn schedule(&self, _alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn cancel(&self, _alarm: &AlarmInstance) -> Result<(), SchedulerError> {
        Ok(())
    }
}

/// A scheduler call that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "alarm", rename_all = "lowercase")]
pub enum SchedulerCall {
    Schedule(AlarmInstance),
    Cancel(AlarmInstance),
}

impl SchedulerCall {
    pub fn alarm(&self) -> &AlarmInstance {
        match self {
            SchedulerCall::Schedule(a) | SchedulerCall::Cancel(a) => a,
        }
    }
}

/// Issue `call`, returning it back when the scheduler fails.
pub fn dispatch<S: AlarmScheduler>(scheduler: &S, call: SchedulerCall) -> Option<SchedulerCall> {
    let res = match &call {
        SchedulerCall::Schedule(a) => scheduler.schedule(a),
        SchedulerCall::Cancel(a) => scheduler.cancel(a),
    };
    match res {
        Ok(()) => None,
        Err(e) => {
            warn!(
                scheduler_id = %call.alarm().scheduler_id,
                label = %call.alarm().label,
                error = %e,
                "alarm scheduler call failed"
            );
            Some(call)
        }
    }
}

/// Re-attempt previously failed calls in order. Returns the ones that still fail.
///
/// A pending schedule call is dropped once its alarm is gone from `store`: a later
/// reconciliation replaced it, and scheduling it now would leave an alarm with no record.
pub fn retry_pending<S: AlarmScheduler, St: Store>(
    scheduler: &S,
    store: &St,
    calls: Vec<SchedulerCall>,
) -> StoreResult<Vec<SchedulerCall>> {
    let mut still = Vec::new();
    for call in calls {
        if let SchedulerCall::Schedule(alarm) = &call {
            let stored = store
                .query_alarm_instances(month_range(alarm.plan_date))?
                .iter()
                .any(|a| a.id == alarm.id);
            if !stored {
                debug!(
                    scheduler_id = %alarm.scheduler_id,
                    "alarm no longer stored, schedule dropped"
                );
                continue;
            }
        }
        still.extend(dispatch(scheduler, call));
    }
    Ok(still)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Fails the first `fail_times` calls.
    struct Flaky {
        fail_times: Cell<u32>,
    }

    impl AlarmScheduler for Flaky {
        fn schedule(&self, _alarm: &AlarmInstance) -> Result<(), SchedulerError> {
            let left = self.fail_times.get();
            if left > 0 {
                self.fail_times.set(left - 1);
                return Err(SchedulerError::Rejected("busy".into()));
            }
            Ok(())
        }

        fn cancel(&self, alarm: &AlarmInstance) -> Result<(), SchedulerError> {
            self.schedule(alarm)
        }
    }

    fn alarm() -> AlarmInstance {
        let at = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(7, 30, 0).unwrap();
        AlarmInstance::new(at.date(), at, "起床", "A")
    }

    #[test]
    fn test_retry_pending_drains_after_recovery() {
        let s = Flaky { fail_times: Cell::new(2) };
        let a = alarm();
        let mut store = MemoryStore::new();
        store.insert_alarm_instance(a.clone()).unwrap();

        let first = dispatch(&s, SchedulerCall::Schedule(a));
        assert!(first.is_some());

        let calls = vec![first.unwrap(), SchedulerCall::Cancel(alarm())];
        let still = retry_pending(&s, &store, calls).unwrap();
        assert_eq!(still.len(), 1);
        assert!(matches!(still[0], SchedulerCall::Schedule(_)));

        assert!(retry_pending(&s, &store, still).unwrap().is_empty());
    }

    #[test]
    fn test_retry_drops_schedule_for_unstored_alarm() {
        let s = Flaky { fail_times: Cell::new(0) };
        let store = MemoryStore::new();
        let calls = vec![SchedulerCall::Schedule(alarm()), SchedulerCall::Cancel(alarm())];
        assert!(retry_pending(&s, &store, calls).unwrap().is_empty());
    }

    #[test]
    fn test_noop_scheduler_accepts_everything() {
        assert!(dispatch(&NoopScheduler, SchedulerCall::Cancel(alarm())).is_none());
    }
}

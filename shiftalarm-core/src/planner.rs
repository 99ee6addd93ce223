//! Month plan reconciliation: replace a month's day-plans and alarms with a new draft batch.
//!
//! Sequence per call:
//! - drop every day-plan in the month
//! - cancel (scheduler) then delete (store) every alarm in the month
//! - insert one day-plan per draft, derive and schedule alarms for working shifts
//!
//! Store failures abort the call. Scheduler failures are logged and returned as
//! pending calls in the report.

use chrono::Datelike;
use tracing::{debug, info};

use crate::alarms::derive_alarms;
use crate::catalog::ShiftCatalog;
use crate::drafts::DayPlanDraft;
use crate::error::{PlanError, PlanResult};
use crate::plans::{DayPlan, SOURCE_OCR};
use crate::scheduler::{AlarmScheduler, SchedulerCall, dispatch};
use crate::store::Store;
use crate::time::{DateRange, month_range, month_start};

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub range: Option<DateRange>,
    pub removed_plans: usize,
    pub removed_alarms: usize,
    pub created_plans: usize,
    pub created_alarms: usize,
    /// Drafts whose shift name matched nothing in the catalog.
    pub unresolved: Vec<DayPlanDraft>,
    /// Scheduler calls that failed; hand them to `retry_pending` later.
    pub pending: Vec<SchedulerCall>,
}

/// Owns the store and the scheduler used for reconciliation.
#[derive(Debug, Clone)]
pub struct MonthPlanner<S: Store, A: AlarmScheduler> {
    store: S,
    scheduler: A,
}

impl<S: Store, A: AlarmScheduler> MonthPlanner<S, A> {
    pub fn new(store: S, scheduler: A) -> Self {
        Self { store, scheduler }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &A {
        &self.scheduler
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the month covered by `drafts` with plans and alarms derived from them.
    ///
    /// All drafts must fall in one calendar month; a mixed batch is rejected before
    /// anything is touched (see `split_by_month`). An empty batch is a no-op.
    pub fn apply_month(
        &mut self,
        drafts: &[DayPlanDraft],
        catalog: &ShiftCatalog,
    ) -> PlanResult<ReconcileReport> {
        let Some(first) = drafts.first() else {
            return Ok(ReconcileReport::default());
        };

        let month = month_start(first.date);
        if let Some(other) = drafts.iter().find(|d| month_start(d.date) != month) {
            return Err(PlanError::MixedMonths {
                expected: month,
                found: other.date,
            });
        }

        let range = month_range(first.date);
        let mut report = ReconcileReport {
            range: Some(range),
            ..Default::default()
        };

        for plan in self.store.query_day_plans(range)? {
            self.store.delete_day_plan(plan.id)?;
            report.removed_plans += 1;
        }

        for alarm in self.store.query_alarm_instances(range)? {
            let id = alarm.id;
            if let Some(failed) = dispatch(&self.scheduler, SchedulerCall::Cancel(alarm)) {
                report.pending.push(failed);
            }
            self.store.delete_alarm_instance(id)?;
            report.removed_alarms += 1;
        }

        for draft in drafts {
            self.store
                .insert_day_plan(DayPlan::new(draft.date, SOURCE_OCR, draft.shift_name.clone()))?;
            report.created_plans += 1;

            let Some(shift) = catalog.get(&draft.shift_name) else {
                debug!(date = %draft.date, shift = %draft.shift_name, "unknown shift, no alarms");
                report.unresolved.push(draft.clone());
                continue;
            };
            if shift.is_rest() {
                continue;
            }

            for alarm in derive_alarms(shift, draft.date) {
                self.store.insert_alarm_instance(alarm.clone())?;
                report.created_alarms += 1;
                if let Some(failed) = dispatch(&self.scheduler, SchedulerCall::Schedule(alarm)) {
                    report.pending.push(failed);
                }
            }
        }

        info!(
            year = month.year(),
            month = month.month(),
            removed_plans = report.removed_plans,
            removed_alarms = report.removed_alarms,
            created_plans = report.created_plans,
            created_alarms = report.created_alarms,
            pending = report.pending.len(),
            "month plan reconciled"
        );

        Ok(report)
    }
}

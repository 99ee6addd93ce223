//! Storage contract for day-plans and alarm instances, plus an in-memory implementation.

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::plans::{AlarmInstance, DayPlan};
use crate::time::DateRange;

/// Range-queried CRUD over the two persisted record kinds.
///
/// Mutations take `&mut self`: one reconciliation owns the store for its whole run.
pub trait Store {
    /// Day-plans whose date falls in `range`, ordered by date.
    fn query_day_plans(&self, range: DateRange) -> StoreResult<Vec<DayPlan>>;
    fn delete_day_plan(&mut self, id: Uuid) -> StoreResult<()>;
    fn insert_day_plan(&mut self, plan: DayPlan) -> StoreResult<()>;

    /// Alarm instances whose owning shift day (`plan_date`) falls in `range`, ordered
    /// by date-time.
    fn query_alarm_instances(&self, range: DateRange) -> StoreResult<Vec<AlarmInstance>>;
    fn delete_alarm_instance(&mut self, id: Uuid) -> StoreResult<()>;
    fn insert_alarm_instance(&mut self, alarm: AlarmInstance) -> StoreResult<()>;
}

/// Vec-backed store for tests and single-process use.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub day_plans: Vec<DayPlan>,
    #[serde(default)]
    pub alarms: Vec<AlarmInstance>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alarm instances, ordered by date-time.
    pub fn all_alarms(&self) -> Vec<AlarmInstance> {
        let mut out = self.alarms.clone();
        out.sort_by_key(|a| a.date_time);
        out
    }
}

impl Store for MemoryStore {
    fn query_day_plans(&self, range: DateRange) -> StoreResult<Vec<DayPlan>> {
        let mut out: Vec<DayPlan> = self
            .day_plans
            .iter()
            .filter(|p| range.contains_date(p.date))
            .cloned()
            .collect();
        out.sort_by_key(|p| p.date);
        Ok(out)
    }

    fn delete_day_plan(&mut self, id: Uuid) -> StoreResult<()> {
        let idx = self
            .day_plans
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.day_plans.remove(idx);
        Ok(())
    }

    fn insert_day_plan(&mut self, plan: DayPlan) -> StoreResult<()> {
        self.day_plans.push(plan);
        Ok(())
    }

    fn query_alarm_instances(&self, range: DateRange) -> StoreResult<Vec<AlarmInstance>> {
        let mut out: Vec<AlarmInstance> = self
            .alarms
            .iter()
            .filter(|a| range.contains_date(a.plan_date))
            .cloned()
            .collect();
        out.sort_by_key(|a| a.date_time);
        Ok(out)
    }

    fn delete_alarm_instance(&mut self, id: Uuid) -> StoreResult<()> {
        let idx = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.alarms.remove(idx);
        Ok(())
    }

    fn insert_alarm_instance(&mut self, alarm: AlarmInstance) -> StoreResult<()> {
        self.alarms.push(alarm);
        Ok(())
    }
}

//! JSON-file store: the whole record set lives in memory and is written back on `save`.

use anyhow::{Context, Result};
use shiftalarm_core::{AlarmInstance, DateRange, DayPlan, MemoryStore, Store, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.inner)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn query_day_plans(&self, range: DateRange) -> StoreResult<Vec<DayPlan>> {
        self.inner.query_day_plans(range)
    }

    fn delete_day_plan(&mut self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_day_plan(id)
    }

    fn insert_day_plan(&mut self, plan: DayPlan) -> StoreResult<()> {
        self.inner.insert_day_plan(plan)
    }

    fn query_alarm_instances(&self, range: DateRange) -> StoreResult<Vec<AlarmInstance>> {
        self.inner.query_alarm_instances(range)
    }

    fn delete_alarm_instance(&mut self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_alarm_instance(id)
    }

    fn insert_alarm_instance(&mut self, alarm: AlarmInstance) -> StoreResult<()> {
        self.inner.insert_alarm_instance(alarm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_save_and_reopen() {
        let dir = std::env::temp_dir().join(format!("shiftalarm-store-{}", std::process::id()));
        let path = dir.join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let d = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        store.insert_day_plan(DayPlan::new(d, "OCR", "A")).unwrap();
        let at = d.and_hms_opt(7, 30, 0).unwrap();
        store.insert_alarm_instance(AlarmInstance::new(d, at, "起床", "A")).unwrap();
        store.save().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.records(), store.records());

        fs::remove_dir_all(&dir).ok();
    }
}

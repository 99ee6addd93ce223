//! shiftalarm-core: shift catalog, classification, alarm derivation and month reconciliation

pub mod alarms;
pub mod catalog;
pub mod classifier;
pub mod drafts;
pub mod error;
pub mod planner;
pub mod plans;
pub mod recognition;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod time;

pub use alarms::{ShiftWindow, derive_alarms};
pub use catalog::{
    AlarmAnchor, AlarmTemplate, REST_SHIFT_NAME, ShiftCatalog, ShiftType, default_catalog,
    parse_keywords,
};
pub use classifier::{Fallback, ShiftClassifier};
pub use drafts::{DayPlanDraft, reassign_range, split_by_month};
pub use error::{CatalogError, PlanError, PlanResult, SchedulerError, StoreError, StoreResult};
pub use planner::{MonthPlanner, ReconcileReport};
pub use plans::{AlarmInstance, DayPlan, SOURCE_OCR};
pub use recognition::{DayEntry, MonthRecognition};
pub use scheduler::{AlarmScheduler, NoopScheduler, SchedulerCall, retry_pending};
pub use settings::AlarmDefaults;
pub use store::{MemoryStore, Store};
pub use time::{DateRange, month_range};

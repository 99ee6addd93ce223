//! Error types for the catalog, the store contract and month reconciliation.

use chrono::NaiveDate;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for month reconciliation
pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("shift name must not be empty")]
    EmptyName,

    #[error("duplicate shift name: {0}")]
    DuplicateName(String),

    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("unknown shift: {0}")]
    UnknownShift(String),
}

/// Fatal storage errors. Anything returned here aborts the current reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("draft batch spans several months: expected {expected}, found {found}")]
    MixedMonths { expected: NaiveDate, found: NaiveDate },
}

/// Failure reported by an external alarm scheduler. Never surfaced by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("alarm scheduler unavailable on this platform")]
    Unavailable,

    #[error("alarm scheduler rejected the request: {0}")]
    Rejected(String),
}

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{AttemptKey, AttemptRecord, LockScope, LockedQuestion};

pub use memory::MemoryAttemptStore;
pub use sqlite::SqliteAttemptStore;

mod memory;
mod sqlite;

/// Result of a grading write against the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The record was written; `locked` is true when this write locked it.
    Tracked { wrong_count: i64, locked: bool },
    /// The record was already locked and nothing was written.
    AlreadyLocked { wrong_count: i64 },
}

/// Persistence for attempt records.
///
/// Every method is a single atomic unit: concurrent calls on the same key
/// must never lose an increment.
#[async_trait]
pub trait AttemptStore: fmt::Debug + Send + Sync {
    /// Creates the record with a zero count if absent. Never lowers an
    /// existing count.
    async fn record_correct(
        &self,
        key: &AttemptKey,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome>;

    /// Inserts or increments the wrong count, locking once it reaches
    /// `threshold`.
    async fn record_wrong(
        &self,
        key: &AttemptKey,
        threshold: i64,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome>;

    async fn locked_questions(&self, scope: &LockScope) -> sqlx::Result<Vec<LockedQuestion>>;

    /// Zeroes the count and clears the lock. A missing record is left
    /// untracked.
    async fn reset(&self, key: &AttemptKey, now: NaiveDateTime) -> sqlx::Result<()>;

    async fn record(&self, key: &AttemptKey) -> sqlx::Result<Option<AttemptRecord>>;
}

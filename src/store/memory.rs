use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use super::{AttemptStore, StoreOutcome};
use crate::models::{AttemptKey, AttemptRecord, LockScope, LockedQuestion};

/// In-process store. Each operation holds the map lock for its whole
/// read-modify-write.
#[derive(Debug, Default)]
pub struct MemoryAttemptStore {
    records: Mutex<HashMap<AttemptKey, AttemptRecord>>,
}

impl MemoryAttemptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptStore for MemoryAttemptStore {
    async fn record_correct(
        &self,
        key: &AttemptKey,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome> {
        let mut records = self.records.lock().await;
        let record = records
            .entry(key.clone())
            .or_insert_with(|| AttemptRecord::new(key, now));

        if record.is_locked {
            return Ok(StoreOutcome::AlreadyLocked {
                wrong_count: record.wrong_count,
            });
        }

        Ok(StoreOutcome::Tracked {
            wrong_count: record.wrong_count,
            locked: false,
        })
    }

    async fn record_wrong(
        &self,
        key: &AttemptKey,
        threshold: i64,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome> {
        let mut records = self.records.lock().await;
        let record = records
            .entry(key.clone())
            .or_insert_with(|| AttemptRecord::new(key, now));

        if record.is_locked {
            return Ok(StoreOutcome::AlreadyLocked {
                wrong_count: record.wrong_count,
            });
        }

        record.wrong_count += 1;
        record.updated_at = now;

        let locked = record.wrong_count >= threshold;
        if locked {
            record.is_locked = true;
            record.locked_at = Some(now);
        }

        Ok(StoreOutcome::Tracked {
            wrong_count: record.wrong_count,
            locked,
        })
    }

    async fn locked_questions(&self, scope: &LockScope) -> sqlx::Result<Vec<LockedQuestion>> {
        let records = self.records.lock().await;

        Ok(records
            .values()
            .filter(|r| {
                r.is_locked
                    && r.user_id == scope.user_id
                    && r.workbook == scope.workbook
                    && r.page == scope.page
            })
            .map(|r| LockedQuestion {
                question_no: r.question_no.clone(),
                wrong_count: r.wrong_count,
            })
            .collect())
    }

    async fn reset(&self, key: &AttemptKey, now: NaiveDateTime) -> sqlx::Result<()> {
        if let Some(record) = self.records.lock().await.get_mut(key) {
            record.wrong_count = 0;
            record.is_locked = false;
            record.unlocked_at = Some(now);
            record.updated_at = now;
        }

        Ok(())
    }

    async fn record(&self, key: &AttemptKey) -> sqlx::Result<Option<AttemptRecord>> {
        Ok(self.records.lock().await.get(key).cloned())
    }
}

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use super::{AttemptStore, StoreOutcome};
use crate::models::{AttemptKey, AttemptRecord, LockScope, LockedQuestion};

/// Attempt records in the `attempt_records` table.
///
/// Writes open a transaction whose first statement is the upsert, so the
/// SQLite write lock is held from the start and concurrent increments on
/// the same key serialize instead of racing.
#[derive(Clone, Debug)]
pub struct SqliteAttemptStore {
    db: SqlitePool,
}

impl SqliteAttemptStore {
    #[must_use]
    pub const fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttemptStore for SqliteAttemptStore {
    async fn record_correct(
        &self,
        key: &AttemptKey,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome> {
        let mut tx = self.db.begin().await?;

        // An existing row is left as is: a correct answer never lowers the count.
        sqlx::query(
            r"INSERT INTO attempt_records
                (user_id, workbook, page, question_no, wrong_count, is_locked, updated_at)
            VALUES (?, ?, ?, ?, 0, FALSE, ?)
            ON CONFLICT (user_id, workbook, page, question_no) DO NOTHING",
        )
        .bind(&key.user_id)
        .bind(&key.workbook)
        .bind(&key.page)
        .bind(&key.question_no)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let (wrong_count, is_locked): (i64, bool) = sqlx::query_as(
            r"SELECT wrong_count, is_locked FROM attempt_records
            WHERE user_id = ? AND workbook = ? AND page = ? AND question_no = ?",
        )
        .bind(&key.user_id)
        .bind(&key.workbook)
        .bind(&key.page)
        .bind(&key.question_no)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if is_locked {
            return Ok(StoreOutcome::AlreadyLocked { wrong_count });
        }

        Ok(StoreOutcome::Tracked {
            wrong_count,
            locked: false,
        })
    }

    async fn record_wrong(
        &self,
        key: &AttemptKey,
        threshold: i64,
        now: NaiveDateTime,
    ) -> sqlx::Result<StoreOutcome> {
        let mut tx = self.db.begin().await?;

        // Locked rows fail the DO UPDATE filter and RETURNING yields nothing.
        let bumped: Option<i64> = sqlx::query_scalar(
            r"INSERT INTO attempt_records
                (user_id, workbook, page, question_no, wrong_count, is_locked, updated_at)
            VALUES (?, ?, ?, ?, 1, FALSE, ?)
            ON CONFLICT (user_id, workbook, page, question_no) DO UPDATE
                SET wrong_count = wrong_count + 1, updated_at = excluded.updated_at
                WHERE is_locked = FALSE
            RETURNING wrong_count",
        )
        .bind(&key.user_id)
        .bind(&key.workbook)
        .bind(&key.page)
        .bind(&key.question_no)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(wrong_count) = bumped else {
            let wrong_count: i64 = sqlx::query_scalar(
                r"SELECT wrong_count FROM attempt_records
                WHERE user_id = ? AND workbook = ? AND page = ? AND question_no = ?",
            )
            .bind(&key.user_id)
            .bind(&key.workbook)
            .bind(&key.page)
            .bind(&key.question_no)
            .fetch_one(&mut *tx)
            .await?;

            tx.rollback().await?;
            return Ok(StoreOutcome::AlreadyLocked { wrong_count });
        };

        let locked = wrong_count >= threshold;
        if locked {
            sqlx::query(
                r"UPDATE attempt_records SET is_locked = TRUE, locked_at = ?
                WHERE user_id = ? AND workbook = ? AND page = ? AND question_no = ?",
            )
            .bind(now)
            .bind(&key.user_id)
            .bind(&key.workbook)
            .bind(&key.page)
            .bind(&key.question_no)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(StoreOutcome::Tracked {
            wrong_count,
            locked,
        })
    }

    async fn locked_questions(&self, scope: &LockScope) -> sqlx::Result<Vec<LockedQuestion>> {
        sqlx::query_as::<_, LockedQuestion>(
            r"SELECT question_no, wrong_count FROM attempt_records
            WHERE user_id = ? AND workbook = ? AND page = ? AND is_locked = TRUE",
        )
        .bind(&scope.user_id)
        .bind(&scope.workbook)
        .bind(&scope.page)
        .fetch_all(&self.db)
        .await
    }

    async fn reset(&self, key: &AttemptKey, now: NaiveDateTime) -> sqlx::Result<()> {
        sqlx::query(
            r"UPDATE attempt_records
            SET wrong_count = 0, is_locked = FALSE, unlocked_at = ?1, updated_at = ?1
            WHERE user_id = ?2 AND workbook = ?3 AND page = ?4 AND question_no = ?5",
        )
        .bind(now)
        .bind(&key.user_id)
        .bind(&key.workbook)
        .bind(&key.page)
        .bind(&key.question_no)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn record(&self, key: &AttemptKey) -> sqlx::Result<Option<AttemptRecord>> {
        sqlx::query_as::<_, AttemptRecord>(
            r"SELECT user_id, workbook, page, question_no, wrong_count, is_locked,
                locked_at, unlocked_at, updated_at
            FROM attempt_records
            WHERE user_id = ? AND workbook = ? AND page = ? AND question_no = ?",
        )
        .bind(&key.user_id)
        .bind(&key.workbook)
        .bind(&key.page)
        .bind(&key.question_no)
        .fetch_optional(&self.db)
        .await
    }
}

use std::sync::Arc;

use chrono::Utc;
use subtle::ConstantTimeEq;

use crate::{
    error::AttemptError,
    models::{AttemptKeyFields, LockScopeFields, LockedQuestion, QuestionType},
    store::{AttemptStore, StoreOutcome},
};

/// Wrong answers on one question before it locks.
pub const LOCK_THRESHOLD: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Graded { locked: bool, wrong_count: i64 },
    /// The question type does not lock; nothing was stored.
    Skipped,
}

/// Wrong-answer counting and locking per (user, workbook, page, question).
#[derive(Clone, Debug)]
pub struct AttemptTracker {
    store: Arc<dyn AttemptStore>,
    admin_key: Arc<str>,
}

impl AttemptTracker {
    #[must_use]
    pub fn new(store: Arc<dyn AttemptStore>, admin_key: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            admin_key: admin_key.into(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn AttemptStore {
        self.store.as_ref()
    }

    pub async fn record_attempt(
        &self,
        fields: AttemptKeyFields,
        question_type: Option<&str>,
        is_correct: Option<bool>,
    ) -> Result<AttemptOutcome, AttemptError> {
        let key = fields.into_key()?;

        let question_type = QuestionType::from(question_type.unwrap_or_default());
        if !question_type.supports_locking() {
            return Ok(AttemptOutcome::Skipped);
        }

        let is_correct = is_correct.ok_or(AttemptError::InvalidRequest("isCorrect"))?;
        let now = Utc::now().naive_utc();

        let outcome = if is_correct {
            self.store.record_correct(&key, now).await?
        } else {
            self.store.record_wrong(&key, LOCK_THRESHOLD, now).await?
        };

        match outcome {
            StoreOutcome::AlreadyLocked { wrong_count } => {
                tracing::debug!(
                    user_id = %key.user_id,
                    workbook = %key.workbook,
                    page = %key.page,
                    question_no = %key.question_no,
                    wrong_count,
                    "attempt rejected on locked question"
                );
                Err(AttemptError::AlreadyLocked { wrong_count })
            }
            StoreOutcome::Tracked {
                wrong_count,
                locked,
            } => {
                if locked {
                    tracing::info!(
                        user_id = %key.user_id,
                        workbook = %key.workbook,
                        page = %key.page,
                        question_no = %key.question_no,
                        wrong_count,
                        "question locked"
                    );
                }
                Ok(AttemptOutcome::Graded {
                    locked,
                    wrong_count,
                })
            }
        }
    }

    pub async fn query_locks(
        &self,
        fields: LockScopeFields,
    ) -> Result<Vec<LockedQuestion>, AttemptError> {
        let scope = fields.into_scope()?;
        Ok(self.store.locked_questions(&scope).await?)
    }

    pub async fn admin_unlock(
        &self,
        credential: Option<&str>,
        fields: AttemptKeyFields,
    ) -> Result<(), AttemptError> {
        if !credential.is_some_and(|given| credential_matches(&self.admin_key, given)) {
            tracing::warn!("admin unlock with a bad or missing credential");
            return Err(AttemptError::Forbidden);
        }

        let key = fields.into_key()?;
        self.store.reset(&key, Utc::now().naive_utc()).await?;

        tracing::info!(
            user_id = %key.user_id,
            workbook = %key.workbook,
            page = %key.page,
            question_no = %key.question_no,
            "question unlocked by admin"
        );

        Ok(())
    }
}

/// Constant-time comparison. An empty configured key matches nothing.
fn credential_matches(expected: &str, given: &str) -> bool {
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
}

mod common;

use std::sync::Arc;

use common::{ADMIN_KEY, key_fields, sqlite_tracker, temp_db};
use grader::{
    AttemptError, AttemptOutcome, AttemptTracker, LOCK_THRESHOLD, LockScopeFields,
    MemoryAttemptStore,
};

const MC: Option<&str> = Some("multiple");

fn memory_tracker() -> AttemptTracker {
    AttemptTracker::new(Arc::new(MemoryAttemptStore::new()), ADMIN_KEY)
}

fn scope(user_id: &str, workbook: &str, page: &str) -> LockScopeFields {
    LockScopeFields {
        user_id: Some(user_id.to_owned()),
        workbook: Some(workbook.to_owned()),
        page: Some(page.to_owned()),
    }
}

async fn wrong(tracker: &AttemptTracker, question_no: &str) -> Result<AttemptOutcome, AttemptError> {
    tracker
        .record_attempt(key_fields("u1", "Math1", "5", question_no), MC, Some(false))
        .await
}

async fn correct(tracker: &AttemptTracker, question_no: &str) -> Result<AttemptOutcome, AttemptError> {
    tracker
        .record_attempt(key_fields("u1", "Math1", "5", question_no), MC, Some(true))
        .await
}

async fn stored_count(tracker: &AttemptTracker, question_no: &str) -> Option<(i64, bool)> {
    let key = key_fields("u1", "Math1", "5", question_no)
        .into_key()
        .expect("key");
    tracker
        .store()
        .record(&key)
        .await
        .expect("read record")
        .map(|r| (r.wrong_count, r.is_locked))
}

async fn locks_on_second_wrong_answer(tracker: AttemptTracker) {
    assert_eq!(LOCK_THRESHOLD, 2);

    assert_eq!(
        wrong(&tracker, "3").await.expect("first"),
        AttemptOutcome::Graded {
            locked: false,
            wrong_count: 1
        }
    );
    assert_eq!(
        wrong(&tracker, "3").await.expect("second"),
        AttemptOutcome::Graded {
            locked: true,
            wrong_count: 2
        }
    );

    let err = wrong(&tracker, "3").await.expect_err("locked");
    assert!(matches!(err, AttemptError::AlreadyLocked { wrong_count: 2 }));

    let err = correct(&tracker, "3").await.expect_err("locked");
    assert!(matches!(err, AttemptError::AlreadyLocked { wrong_count: 2 }));

    assert_eq!(stored_count(&tracker, "3").await, Some((2, true)));
}

async fn correct_first_tracks_at_zero(tracker: AttemptTracker) {
    assert_eq!(
        correct(&tracker, "1").await.expect("correct"),
        AttemptOutcome::Graded {
            locked: false,
            wrong_count: 0
        }
    );
    assert_eq!(stored_count(&tracker, "1").await, Some((0, false)));
}

async fn correct_does_not_forgive(tracker: AttemptTracker) {
    wrong(&tracker, "2").await.expect("wrong");

    assert_eq!(
        correct(&tracker, "2").await.expect("correct"),
        AttemptOutcome::Graded {
            locked: false,
            wrong_count: 1
        }
    );
    assert_eq!(stored_count(&tracker, "2").await, Some((1, false)));

    assert_eq!(
        wrong(&tracker, "2").await.expect("wrong again"),
        AttemptOutcome::Graded {
            locked: true,
            wrong_count: 2
        }
    );
}

async fn unlock_restarts_counting(tracker: AttemptTracker) {
    wrong(&tracker, "4").await.expect("wrong");
    wrong(&tracker, "4").await.expect("wrong");

    let locks = tracker
        .query_locks(scope("u1", "Math1", "5"))
        .await
        .expect("locks");
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].question_no, "4");
    assert_eq!(locks[0].wrong_count, 2);

    tracker
        .admin_unlock(Some(ADMIN_KEY), key_fields("u1", "Math1", "5", "4"))
        .await
        .expect("unlock");
    assert_eq!(stored_count(&tracker, "4").await, Some((0, false)));
    assert!(
        tracker
            .query_locks(scope("u1", "Math1", "5"))
            .await
            .expect("locks")
            .is_empty()
    );

    assert_eq!(
        wrong(&tracker, "4").await.expect("wrong after unlock"),
        AttemptOutcome::Graded {
            locked: false,
            wrong_count: 1
        }
    );
}

async fn unlock_untracked_is_a_no_op(tracker: AttemptTracker) {
    tracker
        .admin_unlock(Some(ADMIN_KEY), key_fields("u1", "Math1", "5", "99"))
        .await
        .expect("unlock");
    assert_eq!(stored_count(&tracker, "99").await, None);

    // Unlocking an unlocked record also just resets it.
    wrong(&tracker, "98").await.expect("wrong");
    tracker
        .admin_unlock(Some(ADMIN_KEY), key_fields("u1", "Math1", "5", "98"))
        .await
        .expect("unlock");
    assert_eq!(stored_count(&tracker, "98").await, Some((0, false)));
}

async fn locks_are_scoped(tracker: AttemptTracker) {
    for _ in 0..2 {
        tracker
            .record_attempt(key_fields("u1", "Math1", "5", "1"), MC, Some(false))
            .await
            .expect("u1");
        tracker
            .record_attempt(key_fields("u2", "Math1", "5", "1"), MC, Some(false))
            .await
            .expect("u2");
        tracker
            .record_attempt(key_fields("u1", "Math1", "6", "1"), MC, Some(false))
            .await
            .expect("other page");
    }
    wrong(&tracker, "2").await.expect("single wrong");

    let locks = tracker
        .query_locks(scope("u1", "Math1", "5"))
        .await
        .expect("locks");
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].question_no, "1");

    let err = tracker
        .query_locks(LockScopeFields::default())
        .await
        .expect_err("missing scope");
    assert!(matches!(err, AttemptError::InvalidRequest(_)));
}

macro_rules! against_both_stores {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(super::memory_tracker()).await;
                }
            )*
        }

        mod sqlite {
            $(
                #[tokio::test]
                async fn $name() {
                    let (_dir, db) = super::temp_db().await;
                    super::$name(super::sqlite_tracker(&db)).await;
                }
            )*
        }
    };
}

against_both_stores!(
    locks_on_second_wrong_answer,
    correct_first_tracks_at_zero,
    correct_does_not_forgive,
    unlock_restarts_counting,
    unlock_untracked_is_a_no_op,
    locks_are_scoped,
);
